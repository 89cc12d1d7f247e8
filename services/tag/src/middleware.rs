//! Per-IP fixed-window request limits applied as axum middleware.
//!
//! Counters live in Redis. When Redis is unreachable the request is let
//! through and the failure logged.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::repository::RequestLimiter;
use crate::error::TagServiceError;
use crate::extract::ClientIp;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
pub struct LimitPolicy {
    /// Key prefix; each policy counts independently.
    pub scope: &'static str,
    pub max: u64,
    pub window_secs: u64,
    pub rejection: fn() -> TagServiceError,
}

pub const GLOBAL_LIMIT: LimitPolicy = LimitPolicy {
    scope: "global",
    max: 200,
    window_secs: 15 * 60,
    rejection: || TagServiceError::TooManyRequests,
};

pub const ADMIN_LIMIT: LimitPolicy = LimitPolicy {
    scope: "admin",
    max: 30,
    window_secs: 15 * 60,
    rejection: || TagServiceError::TooManyAdminRequests,
};

pub const OTP_SEND_LIMIT: LimitPolicy = LimitPolicy {
    scope: "otp",
    max: 5,
    window_secs: 10 * 60,
    rejection: || TagServiceError::TooManyOtpRequests,
};

/// Count one hit for `ip` under `policy`.
pub async fn enforce<R: RequestLimiter>(
    limiter: &R,
    policy: &LimitPolicy,
    ip: &str,
) -> Result<(), TagServiceError> {
    let key = format!("{}:{}", policy.scope, ip);
    match limiter.hit(&key, policy.window_secs).await {
        Ok(hits) if hits > policy.max => {
            tracing::warn!(scope = policy.scope, caller_ip = %ip, hits, "request limit exceeded");
            Err((policy.rejection)())
        }
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!(error = ?e, scope = policy.scope, "request limiter unavailable");
            Ok(())
        }
    }
}

async fn limit(
    state: &AppState,
    policy: &LimitPolicy,
    ip: &str,
    req: Request,
    next: Next,
) -> Result<Response, TagServiceError> {
    enforce(&state.limiter(), policy, ip).await?;
    Ok(next.run(req).await)
}

pub async fn global_rate_limit(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    req: Request,
    next: Next,
) -> Result<Response, TagServiceError> {
    limit(&state, &GLOBAL_LIMIT, &ip, req, next).await
}

pub async fn admin_rate_limit(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    req: Request,
    next: Next,
) -> Result<Response, TagServiceError> {
    limit(&state, &ADMIN_LIMIT, &ip, req, next).await
}

pub async fn otp_send_rate_limit(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    req: Request,
    next: Next,
) -> Result<Response, TagServiceError> {
    limit(&state, &OTP_SEND_LIMIT, &ip, req, next).await
}
