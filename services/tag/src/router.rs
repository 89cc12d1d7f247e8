use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use vahan_core::health::healthz;
use vahan_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::error::TagServiceError;
use crate::extract::X_ADMIN_KEY;
use crate::handlers::{
    admin::{activate_qr, list_logs, revoke_qr, upsert_profile},
    emergency::{emergency_call, emergency_sms, get_emergency},
    health::readyz,
    otp::{send_otp, verify_otp},
    qr::{contact_owner, create_qr, get_qr},
};
use crate::middleware::{admin_rate_limit, global_rate_limit, otp_send_rate_limit};
use crate::state::AppState;

/// Cap on request bodies. Larger JSON bodies fail extraction and render as
/// 400 `INVALID_BODY`.
pub const MAX_BODY_BYTES: usize = 10 * 1024;

pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    health_routes()
        .merge(api_routes(state.clone()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}

/// Liveness and readiness, kept out of the request limiters.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}

/// Everything behind the global per-IP limit, including the JSON 404.
fn api_routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/qr", post(create_qr))
        .route("/admin/qr/{code}/activate", patch(activate_qr))
        .route("/admin/qr/{code}/revoke", patch(revoke_qr))
        .route("/admin/qr/{code}/profile", put(upsert_profile))
        .route("/admin/qr/{code}/logs", get(list_logs))
        .route_layer(from_fn_with_state(state.clone(), admin_rate_limit));

    let otp_send = Router::new()
        .route("/otp/send", post(send_otp))
        .route_layer(from_fn_with_state(state.clone(), otp_send_rate_limit));

    Router::new()
        // Owner page
        .route("/qr/{code}", get(get_qr))
        .route("/qr/{code}/contact", post(contact_owner))
        // Bystander page
        .route("/emergency/{code}", get(get_emergency))
        .route("/emergency/{code}/call", post(emergency_call))
        .route("/emergency/{code}/sms", post(emergency_sms))
        // OTP
        .route("/otp/verify", post(verify_otp))
        .merge(otp_send)
        // Admin
        .merge(admin)
        .fallback(route_not_found)
        .layer(from_fn_with_state(state, global_rate_limit))
}

async fn route_not_found() -> TagServiceError {
    TagServiceError::RouteNotFound
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(X_ADMIN_KEY)])
}
