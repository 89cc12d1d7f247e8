use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr, sea_query::OnConflict,
};
use uuid::Uuid;

use vahan_core::sea_ext::DbErrExt as _;
use vahan_domain::mobile::Mobile;
use vahan_domain::qr::{QrCode, TagStatus};
use vahan_tag_schema::{emergency_logs, otp_verifications, qr_tags, vehicle_profiles};

use crate::domain::repository::{
    EmergencyLogRepository, OtpRepository, ProfileRepository, QrTagRepository,
};
use crate::domain::types::{EmergencyLog, OtpVerification, QrTag, VehicleProfile};
use crate::error::TagServiceError;

// ── QrTag repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbQrTagRepository {
    pub db: DatabaseConnection,
}

impl QrTagRepository for DbQrTagRepository {
    async fn find_by_code(&self, code: &QrCode) -> Result<Option<QrTag>, TagServiceError> {
        let model = qr_tags::Entity::find()
            .filter(qr_tags::Column::QrCode.eq(code.as_str()))
            .one(&self.db)
            .await
            .context("find qr tag by code")?;
        Ok(model.map(qr_tag_from_model).transpose()?)
    }

    async fn create(&self, tag: &QrTag) -> Result<(), TagServiceError> {
        let result = qr_tags::ActiveModel {
            id: Set(tag.id),
            qr_code: Set(tag.code.as_str().to_owned()),
            tag_type: Set(tag.tag_type.as_str().to_owned()),
            status: Set(tag.status.as_str().to_owned()),
            activated_at: Set(tag.activated_at),
            expires_at: Set(tag.expires_at),
            created_at: Set(tag.created_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.is_unique_violation() => Err(TagServiceError::QrAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create qr tag").into()),
        }
    }

    async fn activate(
        &self,
        id: Uuid,
        activated_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), TagServiceError> {
        qr_tags::ActiveModel {
            id: Set(id),
            status: Set(TagStatus::Active.as_str().to_owned()),
            activated_at: Set(Some(activated_at)),
            expires_at: Set(expires_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("activate qr tag")?;
        Ok(())
    }

    async fn revoke(&self, id: Uuid) -> Result<(), TagServiceError> {
        qr_tags::ActiveModel {
            id: Set(id),
            status: Set(TagStatus::Revoked.as_str().to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("revoke qr tag")?;
        Ok(())
    }
}

fn qr_tag_from_model(model: qr_tags::Model) -> anyhow::Result<QrTag> {
    Ok(QrTag {
        id: model.id,
        code: QrCode::parse(&model.qr_code)
            .with_context(|| format!("blank qr_code on tag {}", model.id))?,
        tag_type: model.tag_type.parse()?,
        status: model.status.parse()?,
        activated_at: model.activated_at,
        expires_at: model.expires_at,
        created_at: model.created_at,
    })
}

// ── VehicleProfile repository ────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn find_by_tag(
        &self,
        qr_tag_id: Uuid,
    ) -> Result<Option<VehicleProfile>, TagServiceError> {
        let model = vehicle_profiles::Entity::find_by_id(qr_tag_id)
            .one(&self.db)
            .await
            .context("find vehicle profile by tag")?;
        Ok(model.map(profile_from_model))
    }

    async fn upsert(&self, profile: &VehicleProfile) -> Result<(), TagServiceError> {
        let am = vehicle_profiles::ActiveModel {
            qr_tag_id: Set(profile.qr_tag_id),
            vehicle_number: Set(profile.vehicle_number.clone()),
            owner_mobile: Set(profile.owner_mobile.clone()),
            blood_group: Set(profile.blood_group.clone()),
            model: Set(profile.model.clone()),
            created_at: Set(profile.created_at),
            updated_at: Set(profile.updated_at),
        };
        vehicle_profiles::Entity::insert(am)
            .on_conflict(
                OnConflict::column(vehicle_profiles::Column::QrTagId)
                    .update_columns([
                        vehicle_profiles::Column::VehicleNumber,
                        vehicle_profiles::Column::OwnerMobile,
                        vehicle_profiles::Column::BloodGroup,
                        vehicle_profiles::Column::Model,
                        vehicle_profiles::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert vehicle profile")?;
        Ok(())
    }
}

fn profile_from_model(model: vehicle_profiles::Model) -> VehicleProfile {
    VehicleProfile {
        qr_tag_id: model.qr_tag_id,
        vehicle_number: model.vehicle_number,
        owner_mobile: model.owner_mobile,
        blood_group: model.blood_group,
        model: model.model,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── EmergencyLog repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEmergencyLogRepository {
    pub db: DatabaseConnection,
}

impl EmergencyLogRepository for DbEmergencyLogRepository {
    async fn append(&self, entry: &EmergencyLog) -> Result<(), TagServiceError> {
        emergency_logs::ActiveModel {
            id: Set(entry.id),
            qr_tag_id: Set(entry.qr_tag_id),
            action_type: Set(entry.action.as_str().to_owned()),
            caller_ip: Set(entry.caller_ip.clone()),
            created_at: Set(entry.created_at),
        }
        .insert(&self.db)
        .await
        .context("append emergency log")?;
        Ok(())
    }

    async fn count_by_ip_since(
        &self,
        caller_ip: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, TagServiceError> {
        let count = emergency_logs::Entity::find()
            .filter(emergency_logs::Column::CallerIp.eq(caller_ip))
            .filter(emergency_logs::Column::CreatedAt.gt(since))
            .count(&self.db)
            .await
            .context("count recent emergency logs by ip")?;
        Ok(count)
    }

    async fn list_by_tag(
        &self,
        qr_tag_id: Uuid,
        limit: u64,
    ) -> Result<Vec<EmergencyLog>, TagServiceError> {
        let models = emergency_logs::Entity::find()
            .filter(emergency_logs::Column::QrTagId.eq(qr_tag_id))
            .order_by_desc(emergency_logs::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list emergency logs by tag")?;
        let logs = models
            .into_iter()
            .map(log_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(logs)
    }
}

fn log_from_model(model: emergency_logs::Model) -> anyhow::Result<EmergencyLog> {
    Ok(EmergencyLog {
        id: model.id,
        qr_tag_id: model.qr_tag_id,
        action: model.action_type.parse()?,
        caller_ip: model.caller_ip,
        created_at: model.created_at,
    })
}

// ── OTP repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn invalidate_active(&self, mobile: &Mobile) -> Result<u64, TagServiceError> {
        let result = otp_verifications::Entity::update_many()
            .col_expr(otp_verifications::Column::Verified, Expr::value(true))
            .filter(otp_verifications::Column::Mobile.eq(mobile.as_str()))
            .filter(otp_verifications::Column::Verified.eq(false))
            .exec(&self.db)
            .await
            .context("invalidate active otps")?;
        Ok(result.rows_affected)
    }

    async fn insert(&self, otp: &OtpVerification) -> Result<(), TagServiceError> {
        otp_verifications::ActiveModel {
            id: Set(otp.id),
            mobile: Set(otp.mobile.clone()),
            otp_code: Set(otp.otp_code.clone()),
            expires_at: Set(otp.expires_at),
            verified: Set(otp.verified),
            created_at: Set(otp.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert otp")?;
        Ok(())
    }

    async fn find_latest_valid(
        &self,
        mobile: &Mobile,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpVerification>, TagServiceError> {
        let model = otp_verifications::Entity::find()
            .filter(otp_verifications::Column::Mobile.eq(mobile.as_str()))
            .filter(otp_verifications::Column::OtpCode.eq(code))
            .filter(otp_verifications::Column::Verified.eq(false))
            .filter(otp_verifications::Column::ExpiresAt.gt(now))
            .order_by_desc(otp_verifications::Column::CreatedAt)
            .order_by_desc(otp_verifications::Column::Id)
            .one(&self.db)
            .await
            .context("find latest valid otp")?;
        Ok(model.map(otp_from_model))
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), TagServiceError> {
        otp_verifications::ActiveModel {
            id: Set(id),
            verified: Set(true),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark otp verified")?;
        Ok(())
    }
}

fn otp_from_model(model: otp_verifications::Model) -> OtpVerification {
    OtpVerification {
        id: model.id,
        mobile: model.mobile,
        otp_code: model.otp_code,
        expires_at: model.expires_at,
        verified: model.verified,
        created_at: model.created_at,
    }
}
