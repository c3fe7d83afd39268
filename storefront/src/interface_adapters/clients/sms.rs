use async_trait::async_trait;
use reqwest::{Method, Response};

use crate::domain::{ClientError, OtpApi, OtpReply};
use crate::interface_adapters::clients::{ApiClient, decode};
use crate::interface_adapters::protocol::{HealthReply, SendOtpRequest, VerifyOtpRequest};

// Talks to the OTP backend (`/send-otp`, `/verify-otp`, `/health`).
#[derive(Clone)]
pub struct SmsClient {
    api: ApiClient,
}

impl SmsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn post<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<OtpReply, ClientError> {
        let url = self.api.url(path, &[])?;
        let response = self
            .api
            .request(Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        reply(response).await
    }
}

// Failed sends and wrong codes still answer with a reply body; only fall back
// to the status when the body is not one.
async fn reply(response: Response) -> Result<OtpReply, ClientError> {
    let status = response.status();
    if status.is_success() {
        return decode(response).await;
    }

    match response.json::<OtpReply>().await {
        Ok(reply) => Ok(reply),
        Err(_) => Err(ClientError::Upstream {
            status: status.as_u16(),
            message: format!("HTTP error! status: {}", status.as_u16()),
        }),
    }
}

#[async_trait]
impl OtpApi for SmsClient {
    async fn send_otp(&self, phone: &str) -> Result<OtpReply, ClientError> {
        self.post("/send-otp", &SendOtpRequest { phone_number: phone })
            .await
    }

    async fn verify_otp(&self, phone: &str, otp: &str) -> Result<OtpReply, ClientError> {
        self.post(
            "/verify-otp",
            &VerifyOtpRequest {
                phone_number: phone,
                otp,
            },
        )
        .await
    }

    async fn health(&self) -> Result<bool, ClientError> {
        let url = self.api.url("/health", &[])?;
        let response = self
            .api
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        if !response.status().is_success() {
            return Ok(false);
        }

        let health: HealthReply = decode(response).await?;
        Ok(health.success)
    }
}
