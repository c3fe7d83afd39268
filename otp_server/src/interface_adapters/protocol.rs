use serde::{Deserialize, Serialize};
use serde_json::Value;

// Request payload for sending an OTP.
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    // Missing and empty numbers are both reported as a 400.
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,
}

// Response payload after the gateway accepted the message.
#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

// Request payload for verifying an OTP.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}

// Response payload for a successful verification.
#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
}

// Response payload for the health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

// Error envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}
