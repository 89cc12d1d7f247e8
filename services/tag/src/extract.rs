//! Request extractors shared by the tag handlers.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRef, FromRequest, FromRequestParts};
use axum::http::request::Parts;

use crate::error::TagServiceError;

pub const X_ADMIN_KEY: &str = "x-admin-key";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Caller address used for throttling and the contact log.
///
/// Takes the first entry of `x-forwarded-for` when it parses as an IP address,
/// then the socket peer address, then the literal `"unknown"`. Never rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    // Values are read synchronously so the returned future owns everything it needs.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let forwarded = parts
            .headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .map(|ip| ip.to_string());

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        let ip = forwarded
            .or(peer)
            .unwrap_or_else(|| "unknown".to_owned());

        async move { Ok(Self(ip)) }
    }
}

/// The configured admin key, shared through state.
#[derive(Clone)]
pub struct AdminSecret(pub Arc<str>);

impl AdminSecret {
    /// Compare without short-circuiting on the first differing byte.
    fn matches(&self, presented: &str) -> bool {
        let expected = self.0.as_bytes();
        let presented = presented.as_bytes();
        expected.len() == presented.len()
            && expected
                .iter()
                .zip(presented)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

/// Proof that the request carried the correct `x-admin-key` header.
///
/// Missing header is 401 `ADMIN_KEY_REQUIRED`; a wrong key is 403 `INVALID_ADMIN_KEY`.
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

impl<S> FromRequestParts<S> for AdminGuard
where
    AdminSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = TagServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = AdminSecret::from_ref(state);
        let presented = parts
            .headers
            .get(X_ADMIN_KEY)
            .map(|v| v.to_str().unwrap_or_default().to_owned());

        async move {
            let presented = presented
                .filter(|k| !k.is_empty())
                .ok_or(TagServiceError::AdminKeyRequired)?;
            if !secret.matches(&presented) {
                return Err(TagServiceError::InvalidAdminKey);
            }
            Ok(Self)
        }
    }
}

/// `axum::Json` whose rejection renders as `INVALID_BODY`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(TagServiceError))]
pub struct AppJson<T>(pub T);
