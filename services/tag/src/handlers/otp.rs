use axum::{Json, extract::State};
use serde::Deserialize;

use crate::error::TagServiceError;
use crate::extract::AppJson;
use crate::handlers::qr::MessageResponse;
use crate::state::AppState;
use crate::usecase::otp::{SendOtpInput, SendOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

#[derive(Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub mobile: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    AppJson(body): AppJson<SendOtpRequest>,
) -> Result<Json<MessageResponse>, TagServiceError> {
    let usecase = SendOtpUseCase {
        otps: state.otp_repo(),
        gateway: state.gateway(),
        clock: state.clock(),
    };
    usecase
        .execute(SendOtpInput {
            mobile: body.mobile,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "otp sent successfully",
    }))
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub otp: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    AppJson(body): AppJson<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, TagServiceError> {
    let usecase = VerifyOtpUseCase {
        otps: state.otp_repo(),
        clock: state.clock(),
    };
    usecase
        .execute(VerifyOtpInput {
            mobile: body.mobile,
            otp: body.otp,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "otp verified successfully",
    }))
}
