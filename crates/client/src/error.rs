//! Upload error types.

use filesend_protocol::ErrorInfo;
use serde_json::Value;

/// Errors produced by the upload primitives.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload aborted")]
    Aborted,

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("server responded with status {status}")]
    Status { status: u16, body: Value },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    Request(String),

    #[error("settings error: {0}")]
    Settings(#[from] filesend_settings::SettingsError),
}

impl UploadError {
    /// Classifies a `reqwest` error. Builder failures never reached the
    /// network; everything else did.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            UploadError::Request(err.to_string())
        } else {
            UploadError::Network(err)
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed response body, when the server answered.
    pub fn body(&self) -> Option<&Value> {
        match self {
            UploadError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<UploadError> for ErrorInfo {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Aborted => ErrorInfo::aborted(),
            UploadError::Network(e) => ErrorInfo::network(e.to_string()),
            UploadError::Status { status, body } => ErrorInfo::http_status(status, body),
            other => ErrorInfo::unexpected(other.to_string()),
        }
    }
}
