use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use vahan_domain::qr::{QrCode, TagType};

use crate::domain::repository::{EmergencyLogRepository, ProfileRepository, QrTagRepository};
use crate::domain::types::{EmergencyLog, QrTag, VehicleProfile};
use crate::error::TagServiceError;

/// A tag that passed the status and expiry checks, with its profile when it
/// is a vehicle tag.
#[derive(Debug, Clone)]
pub struct ResolvedTag {
    pub tag: QrTag,
    pub profile: Option<VehicleProfile>,
}

/// Normalize `raw_code`, load the tag and check that it may be resolved at `now`.
///
/// Unknown codes are `QrNotFound`; status is checked before expiry. A vehicle
/// tag with no profile is `ProfileNotFound`, as is any tag without a profile
/// when `require_profile` is set.
pub async fn resolve_tag<Q, P>(
    tags: &Q,
    profiles: &P,
    raw_code: &str,
    now: DateTime<Utc>,
    require_profile: bool,
) -> Result<ResolvedTag, TagServiceError>
where
    Q: QrTagRepository,
    P: ProfileRepository,
{
    let code = QrCode::parse(raw_code).ok_or(TagServiceError::InvalidQrCode)?;
    let tag = tags
        .find_by_code(&code)
        .await?
        .ok_or(TagServiceError::QrNotFound)?;

    tag.ensure_resolvable(now)?;

    let profile = if require_profile || tag.tag_type == TagType::Vehicle {
        Some(
            profiles
                .find_by_tag(tag.id)
                .await?
                .ok_or(TagServiceError::ProfileNotFound)?,
        )
    } else {
        None
    };

    Ok(ResolvedTag { tag, profile })
}

/// Append `entry` on its own task. The caller does not wait on the insert;
/// a failure is reported through `tracing::error!` and the returned handle
/// resolves once the attempt has finished either way.
pub fn record_in_background<L>(logs: L, entry: EmergencyLog) -> JoinHandle<()>
where
    L: EmergencyLogRepository + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = logs.append(&entry).await {
            tracing::error!(
                error = ?e,
                qr_tag_id = %entry.qr_tag_id,
                action = %entry.action,
                "failed to record emergency log"
            );
        }
    })
}
