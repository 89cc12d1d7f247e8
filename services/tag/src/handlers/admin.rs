use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vahan_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};
use vahan_domain::action::ActionType;
use vahan_domain::qr::{QrCode, TagStatus};

use crate::domain::types::{EmergencyLog, QrTag};
use crate::error::TagServiceError;
use crate::extract::{AdminGuard, AppJson};
use crate::state::AppState;
use crate::usecase::admin::{
    ActivateQrInput, ActivateQrUseCase, ListLogsInput, ListLogsUseCase, RevokeQrUseCase,
    UpsertProfileInput, UpsertProfileUseCase,
};

#[derive(Serialize)]
pub struct TagStateResponse {
    pub message: &'static str,
    pub qr_code: QrCode,
    pub status: TagStatus,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub activated_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TagStateResponse {
    fn new(message: &'static str, tag: QrTag) -> Self {
        Self {
            message,
            qr_code: tag.code,
            status: tag.status,
            activated_at: tag.activated_at,
            expires_at: tag.expires_at,
        }
    }
}

// ── PATCH /admin/qr/{code}/activate ───────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ActivateQrRequest {
    /// RFC 3339. Omitted or null activates without expiry.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

pub async fn activate_qr(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Result<Json<ActivateQrRequest>, JsonRejection>,
) -> Result<Json<TagStateResponse>, TagServiceError> {
    // A bodiless PATCH activates without expiry.
    let body = match body {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => ActivateQrRequest::default(),
        Err(e) => return Err(e.into()),
    };
    let usecase = ActivateQrUseCase {
        tags: state.qr_tag_repo(),
        clock: state.clock(),
    };
    let tag = usecase
        .execute(ActivateQrInput {
            code,
            expires_at: body.expires_at,
        })
        .await?;
    Ok(Json(TagStateResponse::new("qr activated", tag)))
}

// ── PATCH /admin/qr/{code}/revoke ─────────────────────────────────────────────

pub async fn revoke_qr(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<TagStateResponse>, TagServiceError> {
    let usecase = RevokeQrUseCase {
        tags: state.qr_tag_repo(),
    };
    let tag = usecase.execute(&code).await?;
    Ok(Json(TagStateResponse::new("qr revoked", tag)))
}

// ── PUT /admin/qr/{code}/profile ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpsertProfileRequest {
    #[serde(default)]
    pub vehicle_number: String,
    #[serde(default)]
    pub owner_mobile: String,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Serialize)]
pub struct ProfileData {
    pub vehicle_number: String,
    pub owner_mobile: String,
    pub blood_group: Option<String>,
    pub model: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub data: ProfileData,
}

pub async fn upsert_profile(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(code): Path<String>,
    AppJson(body): AppJson<UpsertProfileRequest>,
) -> Result<Json<ProfileResponse>, TagServiceError> {
    let usecase = UpsertProfileUseCase {
        tags: state.qr_tag_repo(),
        profiles: state.profile_repo(),
        clock: state.clock(),
    };
    let profile = usecase
        .execute(UpsertProfileInput {
            code,
            vehicle_number: body.vehicle_number,
            owner_mobile: body.owner_mobile,
            blood_group: body.blood_group,
            model: body.model,
        })
        .await?;
    Ok(Json(ProfileResponse {
        message: "profile saved",
        data: ProfileData {
            vehicle_number: profile.vehicle_number,
            owner_mobile: profile.owner_mobile,
            blood_group: profile.blood_group,
            model: profile.model,
            updated_at: profile.updated_at,
        },
    }))
}

// ── GET /admin/qr/{code}/logs ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListLogsQuery {
    /// Kept as text so a malformed value falls back to the default page size.
    pub limit: Option<String>,
}

#[derive(Serialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub action_type: ActionType,
    pub caller_ip: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<EmergencyLog> for LogEntry {
    fn from(log: EmergencyLog) -> Self {
        Self {
            id: log.id,
            action_type: log.action,
            caller_ip: log.caller_ip,
            created_at: log.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ListLogsResponse {
    pub data: Vec<LogEntry>,
}

pub async fn list_logs(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<ListLogsQuery>,
) -> Result<Json<ListLogsResponse>, TagServiceError> {
    let usecase = ListLogsUseCase {
        tags: state.qr_tag_repo(),
        logs: state.log_repo(),
    };
    let logs = usecase
        .execute(ListLogsInput {
            code,
            limit: query.limit.and_then(|l| l.trim().parse().ok()),
        })
        .await?;
    Ok(Json(ListLogsResponse {
        data: logs.into_iter().map(LogEntry::from).collect(),
    }))
}
