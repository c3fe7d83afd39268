use crate::domain::entities::{OtpMessage, OtpRecord};
use crate::domain::errors::OtpError;
use crate::domain::ports::{Clock, CodeGenerator, OtpStore, SmsGateway};

// Response returned by the send OTP use case.
pub struct SendOtpResponse {
    pub request_id: Option<String>,
    // Only surfaced to callers when the server runs in development mode.
    pub otp: String,
    pub expires_at_ms: u64,
}

// Send OTP use case with injected dependencies.
pub struct SendOtpUseCase<C, S, G, R> {
    pub clock: C,
    pub store: S,
    pub gateway: G,
    pub generator: R,
    pub ttl_millis: u64,
}

impl<C, S, G, R> SendOtpUseCase<C, S, G, R>
where
    C: Clock,
    S: OtpStore,
    G: SmsGateway,
    R: CodeGenerator,
{
    pub async fn execute(&self, phone_number: &str) -> Result<SendOtpResponse, OtpError> {
        if phone_number.trim().is_empty() {
            return Err(OtpError::MissingPhoneNumber);
        }

        let otp = self.generator.generate();
        let expires_at_ms = self.clock.now_epoch_millis() + self.ttl_millis;

        // The code is live before dispatch; a resend overwrites it.
        self.store
            .insert(
                phone_number.to_string(),
                OtpRecord {
                    otp: otp.clone(),
                    expires_at_ms,
                },
            )
            .await
            .map_err(|_| OtpError::StorageFailure)?;

        let message = OtpMessage::new(phone_number, &otp, self.ttl_millis);
        let receipt = self
            .gateway
            .send_otp(&message)
            .await
            .map_err(OtpError::GatewayUnavailable)?;

        if !receipt.accepted {
            return Err(OtpError::GatewayRejected(receipt.raw));
        }

        Ok(SendOtpResponse {
            request_id: receipt.request_id,
            otp,
            expires_at_ms,
        })
    }
}
