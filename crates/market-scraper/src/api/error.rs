//! Failure taxonomy for a single API call.

use thiserror::Error;

/// Why one fetch step produced nothing
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with something other than 200
    #[error("unexpected status code {0}")]
    Status(u16),

    /// The body was not the JSON shape the endpoint promises
    #[error("failed to decode response (status {status}): {message}")]
    Decode { status: u16, message: String },
}

impl FetchError {
    /// Status code to report alongside the error, if a response arrived
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Request(_) => None,
            FetchError::Status(status) => Some(*status),
            FetchError::Decode { status, .. } => Some(*status),
        }
    }

    pub fn decode(status: u16, message: impl ToString) -> Self {
        FetchError::Decode {
            status,
            message: message.to_string(),
        }
    }
}
