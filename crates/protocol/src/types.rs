use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::extract_file_ref;

/// JSON object that carries a base64-encoded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base64FilePart {
    pub filename: String,
    pub content_base64: String,
    pub content_type: String,
}

/// Why a transfer did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No response was received, or the request timed out.
    Network,
    /// The server answered with a non-2xx status.
    HttpStatus,
    /// The caller cancelled the transfer.
    Aborted,
    /// Anything else, e.g. the file could not be read.
    Unexpected,
}

/// Structured failure details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ErrorInfo {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn http_status(status: u16, body: Value) -> Self {
        Self {
            kind: ErrorKind::HttpStatus,
            message: format!("server responded with status {status}"),
            status: Some(status),
            body: Some(body),
        }
    }

    pub fn aborted() -> Self {
        Self {
            kind: ErrorKind::Aborted,
            message: "transfer aborted".into(),
            status: None,
            body: None,
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unexpected,
            message: message.into(),
            status: None,
            body: None,
        }
    }
}

/// Outcome of one transfer. Built exactly once, through
/// [`success`](Self::success) or [`failure`](Self::failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Value>,
    pub file_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl TransferResult {
    /// A 2xx response. The file reference is extracted from `body`.
    pub fn success(status: u16, body: Value) -> Self {
        let file_ref = extract_file_ref(&body);
        Self {
            ok: true,
            http_status: Some(status),
            response_body: Some(body),
            file_ref,
            error: None,
        }
    }

    /// A failed transfer. Status and body are lifted from `error` when the
    /// server answered.
    pub fn failure(error: ErrorInfo) -> Self {
        Self {
            ok: false,
            http_status: error.status,
            response_body: error.body.clone(),
            file_ref: None,
            error: Some(error),
        }
    }

    /// Returns `true` when the caller cancelled the transfer.
    pub fn is_aborted(&self) -> bool {
        self.error
            .as_ref()
            .is_some_and(|e| e.kind == ErrorKind::Aborted)
    }
}
