use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::domain::entities::{GatewayReceipt, OtpMessage};
use crate::domain::errors::GatewayError;
use crate::domain::ports::SmsGateway;

pub const DEFAULT_FAST2SMS_URL: &str = "https://www.fast2sms.com/dev/bulkV2";

// Thin reqwest client for the Fast2SMS bulk OTP route.
#[derive(Clone)]
pub struct Fast2SmsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Fast2SmsClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn request_url(&self, message: &OtpMessage) -> Result<Url, GatewayError> {
        Url::parse_with_params(
            &self.base_url,
            &[
                ("authorization", self.api_key.as_str()),
                ("variables_values", message.otp.as_str()),
                ("route", "otp"),
                ("numbers", message.phone_number.as_str()),
                ("message", message.text.as_str()),
            ],
        )
        .map_err(|err| GatewayError::Transport(format!("invalid gateway url: {err}")))
    }
}

#[async_trait]
impl SmsGateway for Fast2SmsClient {
    async fn send_otp(&self, message: &OtpMessage) -> Result<GatewayReceipt, GatewayError> {
        let url = self.request_url(message)?;
        let response = self
            .http
            .get(url)
            .header("cache-control", "no-cache")
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        let status = response.status();

        // Keep the upstream body so callers can see why the provider refused.
        if !status.is_success() {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))?;
        tracing::debug!(response = %body, "fast2sms response");

        Ok(receipt_from_body(body))
    }
}

fn receipt_from_body(body: Value) -> GatewayReceipt {
    let accepted = body.get("return").and_then(Value::as_bool).unwrap_or(false);
    let request_id = body
        .get("request_id")
        .and_then(Value::as_str)
        .map(str::to_string);

    GatewayReceipt {
        accepted,
        request_id,
        raw: body,
    }
}
