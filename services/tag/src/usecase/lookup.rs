use vahan_domain::action::ActionType;

use crate::domain::repository::{Clock, EmergencyLogRepository, ProfileRepository, QrTagRepository};
use crate::domain::types::EmergencyLog;
use crate::error::TagServiceError;
use crate::usecase::resolve::{ResolvedTag, record_in_background, resolve_tag};

pub struct LookupTagInput {
    pub code: String,
    pub caller_ip: String,
    /// Fail with `ProfileNotFound` for tags without a profile, whatever their type.
    pub require_profile: bool,
}

#[derive(Debug)]
pub struct LookupTagOutput {
    pub resolved: ResolvedTag,
    /// The detached log insert. Dropping it leaves the task running.
    pub audit: tokio::task::JoinHandle<()>,
}

/// Read-only resolution (`view` for the owner page, `scan` for the
/// emergency page). Not throttled; the log row is written in the background.
pub struct LookupTagUseCase<Q, P, L, C>
where
    Q: QrTagRepository,
    P: ProfileRepository,
    L: EmergencyLogRepository + Clone + 'static,
    C: Clock,
{
    pub tags: Q,
    pub profiles: P,
    pub logs: L,
    pub clock: C,
    pub action: ActionType,
}

impl<Q, P, L, C> LookupTagUseCase<Q, P, L, C>
where
    Q: QrTagRepository,
    P: ProfileRepository,
    L: EmergencyLogRepository + Clone + 'static,
    C: Clock,
{
    pub async fn execute(&self, input: LookupTagInput) -> Result<LookupTagOutput, TagServiceError> {
        let now = self.clock.now();
        let resolved = resolve_tag(
            &self.tags,
            &self.profiles,
            &input.code,
            now,
            input.require_profile,
        )
        .await?;

        let entry = EmergencyLog::new(resolved.tag.id, self.action, &input.caller_ip, now);
        let audit = record_in_background(self.logs.clone(), entry);

        Ok(LookupTagOutput { resolved, audit })
    }
}
