use chrono::{DateTime, Utc};
use uuid::Uuid;

use vahan_domain::mobile::Mobile;
use vahan_domain::qr::{QrCode, TagStatus, TagType};

use crate::domain::repository::{Clock, EmergencyLogRepository, ProfileRepository, QrTagRepository};
use crate::domain::types::{
    DEFAULT_LOG_LIMIT, EmergencyLog, MAX_LOG_LIMIT, QrTag, VehicleProfile,
};
use crate::error::TagServiceError;

async fn find_tag<Q: QrTagRepository>(tags: &Q, raw_code: &str) -> Result<QrTag, TagServiceError> {
    let code = QrCode::parse(raw_code).ok_or(TagServiceError::InvalidQrCode)?;
    tags.find_by_code(&code)
        .await?
        .ok_or(TagServiceError::QrNotFound)
}

// ── CreateQr ─────────────────────────────────────────────────────────────────

pub struct CreateQrInput {
    pub qr_code: String,
    pub tag_type: String,
}

pub struct CreateQrUseCase<Q: QrTagRepository, C: Clock> {
    pub tags: Q,
    pub clock: C,
}

impl<Q: QrTagRepository, C: Clock> CreateQrUseCase<Q, C> {
    pub async fn execute(&self, input: CreateQrInput) -> Result<QrTag, TagServiceError> {
        let code = QrCode::parse(&input.qr_code).ok_or(TagServiceError::MissingQrFields)?;
        let tag_type = input.tag_type.trim();
        if tag_type.is_empty() {
            return Err(TagServiceError::MissingQrFields);
        }
        let tag_type: TagType = tag_type
            .parse()
            .map_err(|_| TagServiceError::InvalidTagType)?;

        let tag = QrTag {
            id: Uuid::now_v7(),
            code,
            tag_type,
            status: TagStatus::Inactive,
            activated_at: None,
            expires_at: None,
            created_at: self.clock.now(),
        };
        self.tags.create(&tag).await?;
        tracing::info!(qr_code = %tag.code, tag_type = tag.tag_type.as_str(), "qr created");
        Ok(tag)
    }
}

// ── ActivateQr ───────────────────────────────────────────────────────────────

pub struct ActivateQrInput {
    pub code: String,
    /// `None` activates without a subscription end.
    pub expires_at: Option<DateTime<Utc>>,
}

pub struct ActivateQrUseCase<Q: QrTagRepository, C: Clock> {
    pub tags: Q,
    pub clock: C,
}

impl<Q: QrTagRepository, C: Clock> ActivateQrUseCase<Q, C> {
    pub async fn execute(&self, input: ActivateQrInput) -> Result<QrTag, TagServiceError> {
        let now = self.clock.now();
        if matches!(input.expires_at, Some(at) if at <= now) {
            return Err(TagServiceError::InvalidExpiry);
        }
        let mut tag = find_tag(&self.tags, &input.code).await?;
        self.tags.activate(tag.id, now, input.expires_at).await?;

        tag.status = TagStatus::Active;
        tag.activated_at = Some(now);
        tag.expires_at = input.expires_at;
        tracing::info!(qr_code = %tag.code, expires_at = ?tag.expires_at, "qr activated");
        Ok(tag)
    }
}

// ── RevokeQr ─────────────────────────────────────────────────────────────────

pub struct RevokeQrUseCase<Q: QrTagRepository> {
    pub tags: Q,
}

impl<Q: QrTagRepository> RevokeQrUseCase<Q> {
    pub async fn execute(&self, code: &str) -> Result<QrTag, TagServiceError> {
        let mut tag = find_tag(&self.tags, code).await?;
        self.tags.revoke(tag.id).await?;
        tag.status = TagStatus::Revoked;
        tracing::info!(qr_code = %tag.code, "qr revoked");
        Ok(tag)
    }
}

// ── UpsertProfile ────────────────────────────────────────────────────────────

pub struct UpsertProfileInput {
    pub code: String,
    pub vehicle_number: String,
    pub owner_mobile: String,
    pub blood_group: Option<String>,
    pub model: Option<String>,
}

pub struct UpsertProfileUseCase<Q, P, C>
where
    Q: QrTagRepository,
    P: ProfileRepository,
    C: Clock,
{
    pub tags: Q,
    pub profiles: P,
    pub clock: C,
}

impl<Q, P, C> UpsertProfileUseCase<Q, P, C>
where
    Q: QrTagRepository,
    P: ProfileRepository,
    C: Clock,
{
    pub async fn execute(&self, input: UpsertProfileInput) -> Result<VehicleProfile, TagServiceError> {
        let vehicle_number = input.vehicle_number.trim().to_uppercase();
        let raw_mobile = input.owner_mobile.trim();
        if vehicle_number.is_empty() || raw_mobile.is_empty() {
            return Err(TagServiceError::MissingProfileFields);
        }
        let owner_mobile = Mobile::parse(raw_mobile).ok_or(TagServiceError::InvalidMobile)?;

        let tag = find_tag(&self.tags, &input.code).await?;
        if tag.tag_type != TagType::Vehicle {
            return Err(TagServiceError::NotVehicleTag);
        }

        let now = self.clock.now();
        let created_at = self
            .profiles
            .find_by_tag(tag.id)
            .await?
            .map_or(now, |existing| existing.created_at);

        let profile = VehicleProfile {
            qr_tag_id: tag.id,
            vehicle_number,
            owner_mobile: owner_mobile.as_str().to_owned(),
            blood_group: non_blank(input.blood_group),
            model: non_blank(input.model),
            created_at,
            updated_at: now,
        };
        self.profiles.upsert(&profile).await?;
        Ok(profile)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── ListLogs ─────────────────────────────────────────────────────────────────

pub struct ListLogsInput {
    pub code: String,
    pub limit: Option<u64>,
}

pub struct ListLogsUseCase<Q: QrTagRepository, L: EmergencyLogRepository> {
    pub tags: Q,
    pub logs: L,
}

impl<Q: QrTagRepository, L: EmergencyLogRepository> ListLogsUseCase<Q, L> {
    pub async fn execute(&self, input: ListLogsInput) -> Result<Vec<EmergencyLog>, TagServiceError> {
        let limit = input
            .limit
            .unwrap_or(DEFAULT_LOG_LIMIT)
            .clamp(1, MAX_LOG_LIMIT);
        let tag = find_tag(&self.tags, &input.code).await?;
        self.logs.list_by_tag(tag.id, limit).await
    }
}
