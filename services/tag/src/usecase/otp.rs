use anyhow::anyhow;
use chrono::Duration;
use rand::RngExt;
use uuid::Uuid;

use vahan_domain::mobile::Mobile;
use vahan_domain::otp::{OTP_SPACE, OtpCode};

use crate::domain::repository::{Clock, MessageGateway, OtpRepository};
use crate::domain::types::{OTP_TTL_SECS, OtpVerification};
use crate::error::TagServiceError;

/// Uniform over `000000..=999999` from the thread-local CSPRNG.
pub fn generate_otp() -> Result<OtpCode, TagServiceError> {
    let n = rand::rng().random_range(0..OTP_SPACE);
    OtpCode::from_number(n).ok_or_else(|| anyhow!("generated otp {n} out of range").into())
}

// ── SendOtp ──────────────────────────────────────────────────────────────────

pub struct SendOtpInput {
    pub mobile: String,
}

pub struct SendOtpUseCase<O, G, C>
where
    O: OtpRepository,
    G: MessageGateway,
    C: Clock,
{
    pub otps: O,
    pub gateway: G,
    pub clock: C,
}

impl<O, G, C> SendOtpUseCase<O, G, C>
where
    O: OtpRepository,
    G: MessageGateway,
    C: Clock,
{
    pub async fn execute(&self, input: SendOtpInput) -> Result<(), TagServiceError> {
        let raw = input.mobile.trim();
        if raw.is_empty() {
            return Err(TagServiceError::MissingMobile);
        }
        let mobile = Mobile::parse(raw).ok_or(TagServiceError::InvalidMobile)?;

        let code = generate_otp()?;
        let now = self.clock.now();

        // Two statements, no transaction: a concurrent send for the same
        // mobile can leave two open rows. Verify picks the newest.
        let superseded = self.otps.invalidate_active(&mobile).await?;
        self.otps
            .insert(&OtpVerification {
                id: Uuid::now_v7(),
                mobile: mobile.as_str().to_owned(),
                otp_code: code.as_str().to_owned(),
                expires_at: now + Duration::seconds(OTP_TTL_SECS),
                verified: false,
                created_at: now,
            })
            .await?;

        self.gateway.deliver_otp(&mobile, &code).await?;
        tracing::info!(mobile = %mobile.masked(), superseded, "otp issued");
        Ok(())
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub mobile: String,
    pub otp: String,
}

/// Consumes the newest matching OTP. There is no per-mobile attempt limit;
/// only the HTTP request limiter bounds guessing.
pub struct VerifyOtpUseCase<O, C>
where
    O: OtpRepository,
    C: Clock,
{
    pub otps: O,
    pub clock: C,
}

impl<O, C> VerifyOtpUseCase<O, C>
where
    O: OtpRepository,
    C: Clock,
{
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<(), TagServiceError> {
        let raw_mobile = input.mobile.trim();
        let otp = input.otp.trim();
        if raw_mobile.is_empty() || otp.is_empty() {
            return Err(TagServiceError::MissingOtpFields);
        }
        // A malformed number can never have been issued an OTP.
        let mobile = Mobile::parse(raw_mobile).ok_or(TagServiceError::InvalidOtp)?;

        let now = self.clock.now();
        let record = self
            .otps
            .find_latest_valid(&mobile, otp, now)
            .await?
            .ok_or(TagServiceError::InvalidOtp)?;

        self.otps.mark_verified(record.id).await?;
        tracing::info!(mobile = %mobile.masked(), "otp verified");
        Ok(())
    }
}
