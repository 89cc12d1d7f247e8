#![allow(async_fn_in_trait)]

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use vahan_domain::mobile::Mobile;
use vahan_domain::otp::OtpCode;
use vahan_domain::qr::QrCode;

use crate::domain::types::{ContactDispatch, EmergencyLog, OtpVerification, QrTag, VehicleProfile};
use crate::error::TagServiceError;

/// Source of the current time. Injected so expiry and windows are testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Registry of QR tags keyed by normalized code.
pub trait QrTagRepository: Send + Sync {
    async fn find_by_code(&self, code: &QrCode) -> Result<Option<QrTag>, TagServiceError>;

    /// Insert a new tag. Fails with `QrAlreadyExists` on a duplicate code.
    async fn create(&self, tag: &QrTag) -> Result<(), TagServiceError>;

    /// Set status to active with the given activation time and optional expiry.
    async fn activate(
        &self,
        id: Uuid,
        activated_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), TagServiceError>;

    async fn revoke(&self, id: Uuid) -> Result<(), TagServiceError>;
}

/// Vehicle profiles, at most one per tag.
pub trait ProfileRepository: Send + Sync {
    async fn find_by_tag(&self, qr_tag_id: Uuid)
    -> Result<Option<VehicleProfile>, TagServiceError>;

    /// Insert or replace the profile for `profile.qr_tag_id` (keeps `created_at`).
    async fn upsert(&self, profile: &VehicleProfile) -> Result<(), TagServiceError>;
}

/// Append-only contact log.
pub trait EmergencyLogRepository: Send + Sync {
    // Spelled out as `impl Future + Send` so callers can move the insert onto
    // its own task with `tokio::spawn`.
    fn append(
        &self,
        entry: &EmergencyLog,
    ) -> impl Future<Output = Result<(), TagServiceError>> + Send;

    /// Count rows from `caller_ip` created strictly after `since`, all tags and actions.
    async fn count_by_ip_since(
        &self,
        caller_ip: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, TagServiceError>;

    /// Most recent rows for a tag, newest first.
    async fn list_by_tag(
        &self,
        qr_tag_id: Uuid,
        limit: u64,
    ) -> Result<Vec<EmergencyLog>, TagServiceError>;
}

/// Stored OTPs. Each method is a single statement; callers get no
/// transaction across calls.
pub trait OtpRepository: Send + Sync {
    /// Close every unverified OTP for `mobile`. Returns the number closed.
    async fn invalidate_active(&self, mobile: &Mobile) -> Result<u64, TagServiceError>;

    async fn insert(&self, otp: &OtpVerification) -> Result<(), TagServiceError>;

    /// Most recent unverified row for `mobile` with exactly `code` that
    /// expires after `now`.
    async fn find_latest_valid(
        &self,
        mobile: &Mobile,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpVerification>, TagServiceError>;

    async fn mark_verified(&self, id: Uuid) -> Result<(), TagServiceError>;
}

/// Outbound SMS / voice boundary. No provider is wired in yet.
pub trait MessageGateway: Send + Sync {
    async fn deliver_otp(&self, mobile: &Mobile, code: &OtpCode) -> Result<(), TagServiceError>;

    async fn relay_contact(&self, dispatch: &ContactDispatch) -> Result<(), TagServiceError>;
}

/// Fixed-window request counters keyed by caller.
pub trait RequestLimiter: Send + Sync {
    /// Record one hit for `key` and return the number of hits in the current
    /// window (including this one). The window starts at the first hit.
    async fn hit(&self, key: &str, window_secs: u64) -> Result<u64, TagServiceError>;
}
