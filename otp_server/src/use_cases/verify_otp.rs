use crate::domain::errors::OtpError;
use crate::domain::ports::{Clock, OtpStore};

// OTP verification use case with injected dependencies.
pub struct VerifyOtpUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> VerifyOtpUseCase<C, S>
where
    C: Clock,
    S: OtpStore,
{
    pub async fn execute(&self, phone_number: &str, otp: &str) -> Result<(), OtpError> {
        if phone_number.is_empty() || otp.is_empty() {
            return Err(OtpError::MissingFields);
        }

        let record = self
            .store
            .get(phone_number)
            .await
            .map_err(|_| OtpError::StorageFailure)?
            .ok_or(OtpError::NotFound)?;

        if record.is_expired_at(self.clock.now_epoch_millis()) {
            // Best-effort cleanup of the expired code.
            let _ = self.store.remove(phone_number).await;
            return Err(OtpError::Expired);
        }

        // Wrong guesses keep the record so the user can retry until expiry.
        if record.otp != otp {
            return Err(OtpError::Mismatch);
        }

        // Codes are single-use; a failed delete must not report success.
        self.store
            .remove(phone_number)
            .await
            .map_err(|_| OtpError::StorageFailure)?;

        Ok(())
    }
}
