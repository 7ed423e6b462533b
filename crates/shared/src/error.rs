use serde::Deserialize;
use thiserror::Error;

/// Error envelope the book service returns alongside non-2xx statuses. Only
/// ever read, for logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Error)]
#[error("{error}")]
pub struct ServiceError {
    pub error: String,
}

impl ServiceError {
    /// Returns `None` when the body is empty or not the `{ "error": ... }` shape.
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}
