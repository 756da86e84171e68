//! Wire types of the backend REST contract.
//!
//! Every `/email` endpoint answers with the same JSON envelope
//! `{success, message?, data?}`; only the type of `data` changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Standard response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the backend accepted the request
    pub success: bool,

    /// Human-readable outcome, shown to the operator as-is
    #[serde(default)]
    pub message: Option<String>,

    /// Endpoint-specific payload
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: Some(message.into()), data: Some(data) }
    }

    /// Rejection envelope with a message and no data.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()), data: None }
    }

    /// Server message, or `fallback` when the backend sent none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    /// Mark the envelope as failed, e.g. when the HTTP status was not OK.
    pub fn into_failure(mut self) -> Self {
        self.success = false;
        self
    }
}

/// Body of `POST /email/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub subject: String,
    pub message: String,
    pub has_attachment: bool,
}

/// Answer of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"UP"` when the service is healthy
    pub status: String,
    /// Service display name
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case("up")
    }
}

/// A file picked by the operator, ready for a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// File name as picked (no directory part)
    pub name: String,
    /// Raw contents
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), bytes: bytes.into() }
    }

    /// Read a file from disk, keeping only its file name.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
