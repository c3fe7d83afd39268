use thiserror::Error;

/// Errors surfaced by the REST service wrappers.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The backend answered `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// An authenticated endpoint was called without a token.
    #[error("no authentication token found")]
    MissingToken,
}

impl ClientError {
    // Message suitable for showing to a shopper.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Upstream { message, .. } | ClientError::Rejected(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Errors raised by on-device storage adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}
