use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::{GatewayReceipt, OtpMessage, OtpRecord};
use crate::domain::errors::GatewayError;

// Port for OTP storage keyed by phone number.
#[async_trait]
pub trait OtpStore: Send + Sync {
    // Replaces any record already held for the phone number.
    async fn insert(&self, phone_number: String, record: OtpRecord) -> Result<(), String>;
    async fn get(&self, phone_number: &str) -> Result<Option<OtpRecord>, String>;
    async fn remove(&self, phone_number: &str) -> Result<bool, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_millis(&self) -> u64;
}

// Port for producing fresh one-time codes.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

// Port for the third-party SMS provider.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send_otp(&self, message: &OtpMessage) -> Result<GatewayReceipt, GatewayError>;
}

#[async_trait]
impl<T> SmsGateway for Arc<T>
where
    T: SmsGateway + ?Sized,
{
    async fn send_otp(&self, message: &OtpMessage) -> Result<GatewayReceipt, GatewayError> {
        (**self).send_otp(message).await
    }
}
