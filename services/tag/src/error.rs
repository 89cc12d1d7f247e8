use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use vahan_core::error::ErrorBody;

use crate::domain::types::SUPPORT_CONTACT;

/// Tag service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    #[error("invalid qr code")]
    InvalidQrCode,
    #[error("qr_code and type required")]
    MissingQrFields,
    #[error("invalid tag type")]
    InvalidTagType,
    #[error("invalid action_type")]
    InvalidActionType,
    #[error("valid message required")]
    InvalidMessage,
    #[error("mobile required")]
    MissingMobile,
    #[error("invalid mobile number")]
    InvalidMobile,
    #[error("mobile and otp required")]
    MissingOtpFields,
    #[error("invalid or expired otp")]
    InvalidOtp,
    #[error("vehicle_number and owner_mobile required")]
    MissingProfileFields,
    #[error("expires_at must be in the future")]
    InvalidExpiry,
    #[error("qr is not a vehicle tag")]
    NotVehicleTag,
    #[error("invalid request body")]
    InvalidBody,
    #[error("qr already exists")]
    QrAlreadyExists,
    #[error("qr not found")]
    QrNotFound,
    #[error("profile not found")]
    ProfileNotFound,
    #[error("route not found")]
    RouteNotFound,
    #[error("qr not activated")]
    QrInactive,
    #[error("subscription expired")]
    QrExpired,
    #[error("admin key required")]
    AdminKeyRequired,
    #[error("invalid admin key")]
    InvalidAdminKey,
    #[error("too many requests")]
    TooManyContacts,
    #[error("too many otp attempts, try later")]
    TooManyOtpRequests,
    #[error("too many admin requests")]
    TooManyAdminRequests,
    #[error("too many requests, try again later")]
    TooManyRequests,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl TagServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidQrCode => "INVALID_QR_CODE",
            Self::MissingQrFields => "MISSING_QR_FIELDS",
            Self::InvalidTagType => "INVALID_TAG_TYPE",
            Self::InvalidActionType => "INVALID_ACTION_TYPE",
            Self::InvalidMessage => "INVALID_MESSAGE",
            Self::MissingMobile => "MISSING_MOBILE",
            Self::InvalidMobile => "INVALID_MOBILE",
            Self::MissingOtpFields => "MISSING_OTP_FIELDS",
            Self::InvalidOtp => "INVALID_OTP",
            Self::MissingProfileFields => "MISSING_PROFILE_FIELDS",
            Self::InvalidExpiry => "INVALID_EXPIRY",
            Self::NotVehicleTag => "NOT_VEHICLE_TAG",
            Self::InvalidBody => "INVALID_BODY",
            Self::QrAlreadyExists => "QR_ALREADY_EXISTS",
            Self::QrNotFound => "QR_NOT_FOUND",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::RouteNotFound => "ROUTE_NOT_FOUND",
            Self::QrInactive => "QR_INACTIVE",
            Self::QrExpired => "QR_EXPIRED",
            Self::AdminKeyRequired => "ADMIN_KEY_REQUIRED",
            Self::InvalidAdminKey => "INVALID_ADMIN_KEY",
            Self::TooManyContacts => "TOO_MANY_CONTACTS",
            Self::TooManyOtpRequests => "TOO_MANY_OTP_REQUESTS",
            Self::TooManyAdminRequests => "TOO_MANY_ADMIN_REQUESTS",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidQrCode
            | Self::MissingQrFields
            | Self::InvalidTagType
            | Self::InvalidActionType
            | Self::InvalidMessage
            | Self::MissingMobile
            | Self::InvalidMobile
            | Self::MissingOtpFields
            | Self::InvalidOtp
            | Self::MissingProfileFields
            | Self::InvalidExpiry
            | Self::NotVehicleTag
            | Self::InvalidBody
            | Self::QrAlreadyExists => StatusCode::BAD_REQUEST,
            Self::QrNotFound | Self::ProfileNotFound | Self::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::QrInactive | Self::QrExpired | Self::InvalidAdminKey => StatusCode::FORBIDDEN,
            Self::AdminKeyRequired => StatusCode::UNAUTHORIZED,
            Self::TooManyContacts
            | Self::TooManyOtpRequests
            | Self::TooManyAdminRequests
            | Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for TagServiceError {
    fn from(_: JsonRejection) -> Self {
        Self::InvalidBody
    }
}

impl IntoResponse for TagServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Only 500s are logged here; TraceLayer records status for the rest.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = ErrorBody::new(self.kind(), self.to_string());
        if let Self::QrExpired = self {
            body = body
                .with("status", "expired")
                .with(
                    "support",
                    format!("Please contact {SUPPORT_CONTACT} to renew."),
                )
                .with("allow_call", false)
                .with("allow_sms", false);
        }
        body.into_response_with(status)
    }
}
