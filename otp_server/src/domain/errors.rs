use serde_json::Value;
use std::fmt;

// Domain-level errors for OTP workflows.
#[derive(Debug)]
pub enum OtpError {
    MissingPhoneNumber,
    MissingFields,
    NotFound,
    Expired,
    Mismatch,
    // Gateway answered but refused the message.
    GatewayRejected(Value),
    // Gateway could not be reached or answered with a transport-level error.
    GatewayUnavailable(GatewayError),
    StorageFailure,
}

// Failures raised by SMS gateway adapters.
#[derive(Debug)]
pub enum GatewayError {
    Transport(String),
    Upstream { status: u16, body: Value },
    Decode(String),
}

impl GatewayError {
    // Payload surfaced to API callers alongside a 500.
    pub fn detail(&self) -> Value {
        match self {
            GatewayError::Transport(message) | GatewayError::Decode(message) => {
                Value::String(message.clone())
            }
            GatewayError::Upstream { body, .. } => body.clone(),
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Transport(err) => write!(f, "sms transport error: {err}"),
            GatewayError::Upstream { status, body } => {
                write!(f, "sms upstream error {status}: {body}")
            }
            GatewayError::Decode(err) => write!(f, "sms response decode error: {err}"),
        }
    }
}

impl std::error::Error for GatewayError {}
