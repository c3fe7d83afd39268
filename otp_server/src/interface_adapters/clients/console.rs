use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{GatewayReceipt, OtpMessage};
use crate::domain::errors::GatewayError;
use crate::domain::ports::SmsGateway;

// Development gateway: logs the code instead of texting it.
#[derive(Clone, Default)]
pub struct ConsoleSmsGateway;

#[async_trait]
impl SmsGateway for ConsoleSmsGateway {
    async fn send_otp(&self, message: &OtpMessage) -> Result<GatewayReceipt, GatewayError> {
        let request_id = format!("dev-{}", Uuid::new_v4());
        tracing::info!(
            phone_number = %message.phone_number,
            otp = %message.otp,
            %request_id,
            "development mode otp"
        );

        Ok(GatewayReceipt {
            accepted: true,
            request_id: Some(request_id.clone()),
            raw: json!({ "return": true, "request_id": request_id }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn when_message_is_sent_then_receipt_is_accepted_with_dev_request_id() {
        let gateway = ConsoleSmsGateway;

        let receipt = gateway
            .send_otp(&OtpMessage::new("9876543210", "482913", 300_000))
            .await
            .expect("expected console gateway to accept");

        assert!(receipt.accepted);
        assert!(
            receipt
                .request_id
                .as_deref()
                .is_some_and(|id| id.starts_with("dev-"))
        );
    }
}
