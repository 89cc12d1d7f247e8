use vahan_domain::mobile::Mobile;
use vahan_domain::otp::OtpCode;

use crate::domain::repository::MessageGateway;
use crate::domain::types::ContactDispatch;
use crate::error::TagServiceError;

/// Gateway used until an SMS/voice provider is configured. Records the
/// dispatch in the service log and never fails.
#[derive(Clone, Copy, Default)]
pub struct LoggingMessageGateway;

impl MessageGateway for LoggingMessageGateway {
    async fn deliver_otp(&self, mobile: &Mobile, _code: &OtpCode) -> Result<(), TagServiceError> {
        tracing::info!(mobile = %mobile.masked(), "otp delivery queued");
        Ok(())
    }

    async fn relay_contact(&self, dispatch: &ContactDispatch) -> Result<(), TagServiceError> {
        tracing::info!(
            qr_tag_id = %dispatch.qr_tag_id,
            action = %dispatch.action,
            owner = %dispatch.owner_mobile.masked(),
            has_message = dispatch.message.is_some(),
            "contact relay queued"
        );
        Ok(())
    }
}
