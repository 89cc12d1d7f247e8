use anyhow::anyhow;
use chrono::Duration;

use vahan_domain::action::ActionType;
use vahan_domain::mobile::Mobile;

use crate::domain::repository::{
    Clock, EmergencyLogRepository, MessageGateway, ProfileRepository, QrTagRepository,
};
use crate::domain::types::{
    CONTACT_WINDOW_SECS, ContactDispatch, EmergencyLog, MAX_CONTACTS_PER_WINDOW,
    MIN_SMS_MESSAGE_LEN,
};
use crate::error::TagServiceError;
use crate::usecase::resolve::resolve_tag;

pub struct ContactOwnerInput {
    pub code: String,
    pub action: ActionType,
    pub caller_ip: String,
    /// Free-text body for emergency SMS; `None` when the route takes no message.
    pub message: Option<String>,
    /// Fail with `ProfileNotFound` instead of logging without a relay when
    /// the tag has no owner profile.
    pub require_profile: bool,
}

/// Resolve, throttle, log and relay a call/sms to the owner. Shared by every
/// contact-triggering route.
///
/// The throttle counts all log rows from the caller IP in the trailing window,
/// across every tag. Count and insert are separate statements, so concurrent
/// requests from one IP can each see a count under the limit.
pub struct ContactOwnerUseCase<Q, P, L, G, C>
where
    Q: QrTagRepository,
    P: ProfileRepository,
    L: EmergencyLogRepository,
    G: MessageGateway,
    C: Clock,
{
    pub tags: Q,
    pub profiles: P,
    pub logs: L,
    pub gateway: G,
    pub clock: C,
}

impl<Q, P, L, G, C> ContactOwnerUseCase<Q, P, L, G, C>
where
    Q: QrTagRepository,
    P: ProfileRepository,
    L: EmergencyLogRepository,
    G: MessageGateway,
    C: Clock,
{
    pub async fn execute(&self, input: ContactOwnerInput) -> Result<(), TagServiceError> {
        if !input.action.is_contact() {
            return Err(TagServiceError::InvalidActionType);
        }
        let message = input.message.as_deref().map(validate_message).transpose()?;

        let now = self.clock.now();
        let resolved = resolve_tag(
            &self.tags,
            &self.profiles,
            &input.code,
            now,
            input.require_profile,
        )
        .await?;

        let since = now - Duration::seconds(CONTACT_WINDOW_SECS);
        let recent = self.logs.count_by_ip_since(&input.caller_ip, since).await?;
        if recent >= MAX_CONTACTS_PER_WINDOW {
            // Rejected attempts are not logged so a blocked caller's window can drain.
            tracing::warn!(caller_ip = %input.caller_ip, recent, "contact throttled");
            return Err(TagServiceError::TooManyContacts);
        }

        let entry = EmergencyLog::new(resolved.tag.id, input.action, &input.caller_ip, now);
        self.logs.append(&entry).await?;

        match resolved.profile {
            Some(profile) => {
                let owner_mobile = Mobile::parse(&profile.owner_mobile).ok_or_else(|| {
                    anyhow!("stored owner mobile for tag {} is malformed", profile.qr_tag_id)
                })?;
                self.gateway
                    .relay_contact(&ContactDispatch {
                        qr_tag_id: resolved.tag.id,
                        action: input.action,
                        owner_mobile,
                        message,
                    })
                    .await?;
            }
            None => {
                tracing::info!(qr_tag_id = %resolved.tag.id, "no owner profile to relay contact to");
            }
        }
        Ok(())
    }
}

fn validate_message(raw: &str) -> Result<String, TagServiceError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_SMS_MESSAGE_LEN {
        return Err(TagServiceError::InvalidMessage);
    }
    Ok(trimmed.to_owned())
}
