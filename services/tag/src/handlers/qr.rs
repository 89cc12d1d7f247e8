use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vahan_core::serde::to_rfc3339_ms_opt;
use vahan_domain::action::ActionType;
use vahan_domain::qr::{QrCode, TagStatus, TagType};

use crate::error::TagServiceError;
use crate::extract::{AdminGuard, AppJson, ClientIp};
use crate::state::AppState;
use crate::usecase::admin::{CreateQrInput, CreateQrUseCase};
use crate::usecase::contact::{ContactOwnerInput, ContactOwnerUseCase};
use crate::usecase::lookup::{LookupTagInput, LookupTagUseCase};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── GET /qr/{code} ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct QrDetailsResponse {
    pub id: Uuid,
    pub qr_code: QrCode,
    #[serde(rename = "type")]
    pub tag_type: TagType,
    pub status: TagStatus,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub activated_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub expires_at: Option<DateTime<Utc>>,
    pub vehicle_number: Option<String>,
    pub owner_mobile: Option<String>,
    pub blood_group: Option<String>,
    pub model: Option<String>,
}

pub async fn get_qr(
    State(state): State<AppState>,
    ClientIp(caller_ip): ClientIp,
    Path(code): Path<String>,
) -> Result<Json<QrDetailsResponse>, TagServiceError> {
    let usecase = LookupTagUseCase {
        tags: state.qr_tag_repo(),
        profiles: state.profile_repo(),
        logs: state.log_repo(),
        clock: state.clock(),
        action: ActionType::View,
    };
    let output = usecase
        .execute(LookupTagInput {
            code,
            caller_ip,
            require_profile: false,
        })
        .await?;

    let tag = output.resolved.tag;
    let profile = output.resolved.profile;
    Ok(Json(QrDetailsResponse {
        id: tag.id,
        qr_code: tag.code,
        tag_type: tag.tag_type,
        status: tag.status,
        activated_at: tag.activated_at,
        expires_at: tag.expires_at,
        vehicle_number: profile.as_ref().map(|p| p.vehicle_number.clone()),
        owner_mobile: profile.as_ref().map(|p| p.owner_mobile.clone()),
        blood_group: profile.as_ref().and_then(|p| p.blood_group.clone()),
        model: profile.and_then(|p| p.model),
    }))
}

// ── POST /qr/{code}/contact ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub action_type: String,
}

pub async fn contact_owner(
    State(state): State<AppState>,
    ClientIp(caller_ip): ClientIp,
    Path(code): Path<String>,
    AppJson(body): AppJson<ContactRequest>,
) -> Result<Json<MessageResponse>, TagServiceError> {
    let action = body
        .action_type
        .trim()
        .parse::<ActionType>()
        .map_err(|_| TagServiceError::InvalidActionType)?;

    let usecase = ContactOwnerUseCase {
        tags: state.qr_tag_repo(),
        profiles: state.profile_repo(),
        logs: state.log_repo(),
        gateway: state.gateway(),
        clock: state.clock(),
    };
    usecase
        .execute(ContactOwnerInput {
            code,
            action,
            caller_ip,
            message: None,
            require_profile: false,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "contact logged",
    }))
}

// ── POST /qr (admin) ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateQrRequest {
    #[serde(default)]
    pub qr_code: String,
    #[serde(default, rename = "type")]
    pub tag_type: String,
}

#[derive(Serialize)]
pub struct CreatedQr {
    pub id: Uuid,
    pub qr_code: QrCode,
    #[serde(rename = "type")]
    pub tag_type: TagType,
    pub status: TagStatus,
}

#[derive(Serialize)]
pub struct CreateQrResponse {
    pub message: &'static str,
    pub data: CreatedQr,
}

pub async fn create_qr(
    _admin: AdminGuard,
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateQrRequest>,
) -> Result<(StatusCode, Json<CreateQrResponse>), TagServiceError> {
    let usecase = CreateQrUseCase {
        tags: state.qr_tag_repo(),
        clock: state.clock(),
    };
    let tag = usecase
        .execute(CreateQrInput {
            qr_code: body.qr_code,
            tag_type: body.tag_type,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateQrResponse {
            message: "qr created",
            data: CreatedQr {
                id: tag.id,
                qr_code: tag.code,
                tag_type: tag.tag_type,
                status: tag.status,
            },
        }),
    ))
}
