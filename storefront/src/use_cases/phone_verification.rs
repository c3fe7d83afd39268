use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{ClientError, Clock, OtpApi, OtpReply};

// Advisory gap between two sends to the same number.
pub const RESEND_COOLDOWN_MILLIS: u64 = 60_000;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,

    #[error("Please wait {0} seconds before requesting another OTP")]
    CoolingDown(u64),

    #[error("SMS service is temporarily unavailable. Please try again later.")]
    Unavailable,

    #[error("Please enter a valid 6-digit OTP")]
    InvalidCode,

    // The backend answered `success: false`; carries its message.
    #[error("{0}")]
    Rejected(String),

    #[error("Error verifying OTP. Please try again.")]
    VerifyFailed(#[source] ClientError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

// Strips everything but digits from a phone number as typed.
pub fn clean_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

// Client side of OTP login: input checks, cool-down and health probing
// in front of the OTP backend.
pub struct PhoneVerifier<A, C> {
    api: A,
    clock: C,
    last_sent: HashMap<String, u64>,
}

impl<A, C> PhoneVerifier<A, C>
where
    A: OtpApi,
    C: Clock,
{
    pub fn new(api: A, clock: C) -> Self {
        Self {
            api,
            clock,
            last_sent: HashMap::new(),
        }
    }

    pub async fn send(&mut self, phone: &str) -> Result<OtpReply, VerificationError> {
        let phone = clean_phone(phone);
        if phone.len() != 10 {
            return Err(VerificationError::InvalidPhone);
        }

        let remaining = self.remaining_cooldown(&phone);
        if remaining > 0 {
            return Err(VerificationError::CoolingDown(remaining));
        }

        match self.api.health().await {
            Ok(true) => {}
            Ok(false) => return Err(VerificationError::Unavailable),
            Err(err) => {
                tracing::warn!(error = %err, "otp backend health check failed");
                return Err(VerificationError::Unavailable);
            }
        }

        let reply = self.api.send_otp(&phone).await?;
        if !reply.success {
            return Err(VerificationError::Rejected(non_empty_or(
                reply.message,
                "Failed to send OTP",
            )));
        }

        self.last_sent
            .insert(phone.clone(), self.clock.now_epoch_millis());
        if reply.development_mode {
            if let Some(otp) = &reply.otp {
                tracing::info!(phone = %phone, otp = %otp, "development mode otp");
            }
        }
        Ok(reply)
    }

    pub async fn verify(&mut self, phone: &str, code: &str) -> Result<OtpReply, VerificationError> {
        let phone = clean_phone(phone);
        if code.len() != 6 || !code.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(VerificationError::InvalidCode);
        }

        let reply = self
            .api
            .verify_otp(&phone, code)
            .await
            .map_err(VerificationError::VerifyFailed)?;
        if !reply.success {
            return Err(VerificationError::Rejected(reply.message));
        }

        self.last_sent.remove(&phone);
        Ok(reply)
    }

    // Skips the cool-down and sends a fresh code.
    pub async fn resend(&mut self, phone: &str) -> Result<OtpReply, VerificationError> {
        self.last_sent.remove(&clean_phone(phone));
        self.send(phone).await
    }

    // Whole seconds left before another send is allowed, 0 when none.
    pub fn remaining_cooldown(&self, phone: &str) -> u64 {
        let Some(sent_at) = self.last_sent.get(&clean_phone(phone)) else {
            return 0;
        };

        let elapsed = self.clock.now_epoch_millis().saturating_sub(*sent_at);
        RESEND_COOLDOWN_MILLIS
            .saturating_sub(elapsed)
            .div_ceil(1_000)
    }

    // Forgets send times whose cool-down has passed.
    pub fn prune_expired(&mut self) {
        let now = self.clock.now_epoch_millis();
        self.last_sent
            .retain(|_, sent_at| now.saturating_sub(*sent_at) <= RESEND_COOLDOWN_MILLIS);
    }

    pub fn tracked_numbers(&self) -> usize {
        self.last_sent.len()
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
