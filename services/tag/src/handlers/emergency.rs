use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use vahan_domain::action::ActionType;
use vahan_domain::qr::TagType;

use crate::error::TagServiceError;
use crate::extract::{AppJson, ClientIp};
use crate::state::AppState;
use crate::usecase::contact::{ContactOwnerInput, ContactOwnerUseCase};
use crate::usecase::lookup::{LookupTagInput, LookupTagUseCase};

// ── GET /emergency/{code} ─────────────────────────────────────────────────────

/// What a bystander sees. The owner's mobile is never exposed here.
#[derive(Serialize)]
pub struct EmergencyData {
    pub vehicle_number: String,
    pub blood_group: Option<String>,
    pub model: Option<String>,
}

#[derive(Serialize)]
pub struct EmergencyResponse {
    pub message: &'static str,
    #[serde(rename = "type")]
    pub tag_type: TagType,
    pub data: EmergencyData,
    pub allow_call: bool,
    pub allow_sms: bool,
}

pub async fn get_emergency(
    State(state): State<AppState>,
    ClientIp(caller_ip): ClientIp,
    Path(code): Path<String>,
) -> Result<Json<EmergencyResponse>, TagServiceError> {
    let usecase = LookupTagUseCase {
        tags: state.qr_tag_repo(),
        profiles: state.profile_repo(),
        logs: state.log_repo(),
        clock: state.clock(),
        action: ActionType::Scan,
    };
    let output = usecase
        .execute(LookupTagInput {
            code,
            caller_ip,
            require_profile: true,
        })
        .await?;

    let profile = output
        .resolved
        .profile
        .ok_or(TagServiceError::ProfileNotFound)?;
    Ok(Json(EmergencyResponse {
        message: "emergency data fetched",
        tag_type: output.resolved.tag.tag_type,
        data: EmergencyData {
            vehicle_number: profile.vehicle_number,
            blood_group: profile.blood_group,
            model: profile.model,
        },
        allow_call: true,
        allow_sms: true,
    }))
}

// ── POST /emergency/{code}/call and /sms ──────────────────────────────────────

#[derive(Serialize)]
pub struct DispatchResponse {
    pub message: &'static str,
    pub status: &'static str,
}

async fn dispatch(
    state: &AppState,
    code: String,
    caller_ip: String,
    action: ActionType,
    message: Option<String>,
) -> Result<(), TagServiceError> {
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
            message,
            require_profile: true,
        })
        .await
}

pub async fn emergency_call(
    State(state): State<AppState>,
    ClientIp(caller_ip): ClientIp,
    Path(code): Path<String>,
) -> Result<Json<DispatchResponse>, TagServiceError> {
    dispatch(&state, code, caller_ip, ActionType::Call, None).await?;
    Ok(Json(DispatchResponse {
        message: "call initiated",
        status: "processing",
    }))
}

#[derive(Deserialize)]
pub struct EmergencySmsRequest {
    #[serde(default)]
    pub message: String,
}

pub async fn emergency_sms(
    State(state): State<AppState>,
    ClientIp(caller_ip): ClientIp,
    Path(code): Path<String>,
    AppJson(body): AppJson<EmergencySmsRequest>,
) -> Result<Json<DispatchResponse>, TagServiceError> {
    dispatch(&state, code, caller_ip, ActionType::Sms, Some(body.message)).await?;
    Ok(Json(DispatchResponse {
        message: "emergency sms sent",
        status: "processing",
    }))
}
