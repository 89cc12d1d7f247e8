use chrono::{DateTime, Utc};
use uuid::Uuid;

use vahan_domain::action::ActionType;
use vahan_domain::mobile::Mobile;
use vahan_domain::qr::{QrCode, TagStatus, TagType};

use crate::error::TagServiceError;

/// A registered QR tag.
#[derive(Debug, Clone)]
pub struct QrTag {
    pub id: Uuid,
    pub code: QrCode,
    pub tag_type: TagType,
    pub status: TagStatus,
    pub activated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl QrTag {
    /// A tag resolves only when active and not past its expiry.
    /// Status is checked before expiry so an expired-but-inactive tag
    /// reports `QrInactive`.
    pub fn ensure_resolvable(&self, now: DateTime<Utc>) -> Result<(), TagServiceError> {
        if self.status != TagStatus::Active {
            return Err(TagServiceError::QrInactive);
        }
        match self.expires_at {
            Some(expires_at) if expires_at <= now => Err(TagServiceError::QrExpired),
            _ => Ok(()),
        }
    }
}

/// Owner/vehicle details linked to a vehicle tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleProfile {
    pub qr_tag_id: Uuid,
    pub vehicle_number: String,
    pub owner_mobile: String,
    pub blood_group: Option<String>,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the append-only contact log.
#[derive(Debug, Clone)]
pub struct EmergencyLog {
    pub id: Uuid,
    pub qr_tag_id: Uuid,
    pub action: ActionType,
    pub caller_ip: String,
    pub created_at: DateTime<Utc>,
}

impl EmergencyLog {
    pub fn new(qr_tag_id: Uuid, action: ActionType, caller_ip: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            qr_tag_id,
            action,
            caller_ip: caller_ip.to_owned(),
            created_at: now,
        }
    }
}

/// A stored OTP for a mobile number.
#[derive(Debug, Clone)]
pub struct OtpVerification {
    pub id: Uuid,
    pub mobile: String,
    pub otp_code: String,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl OtpVerification {
    pub fn is_verifiable(&self, now: DateTime<Utc>) -> bool {
        !self.verified && self.expires_at > now
    }
}

/// A contact action handed to the message gateway after it has been logged.
#[derive(Debug, Clone)]
pub struct ContactDispatch {
    pub qr_tag_id: Uuid,
    pub action: ActionType,
    pub owner_mobile: Mobile,
    pub message: Option<String>,
}

/// Contact actions allowed per caller IP inside the sliding window.
pub const MAX_CONTACTS_PER_WINDOW: u64 = 5;

/// Sliding window for contact throttling, in seconds.
pub const CONTACT_WINDOW_SECS: i64 = 120;

/// OTP time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 300;

/// Minimum length (in characters, after trimming) of an emergency SMS body.
pub const MIN_SMS_MESSAGE_LEN: usize = 5;

/// Default and maximum page size for the admin log listing.
pub const DEFAULT_LOG_LIMIT: u64 = 50;
pub const MAX_LOG_LIMIT: u64 = 200;

/// Who to contact about renewals, shown with expired-tag responses.
pub const SUPPORT_CONTACT: &str = "Vahan Tag";
