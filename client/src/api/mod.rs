//! Backend API module.
//!
//! The campaign controllers only talk to the backend through the
//! [`MailApi`] trait. [`HttpMailApi`] is the real implementation on top of
//! `reqwest`; unit tests use a scripted fake instead.
//!
//! # Endpoints
//!
//! | Method | Path                       | Description                        |
//! |--------|----------------------------|------------------------------------|
//! | POST   | `/email/add-emails`        | Sync manually entered recipients   |
//! | POST   | `/email/upload`            | Upload a recipient file            |
//! | POST   | `/email/upload-attachment` | Upload the campaign attachment     |
//! | GET    | `/email/attachment-info`   | Name of the stored attachment      |
//! | DELETE | `/email/attachment`        | Drop the stored attachment         |
//! | POST   | `/email/send`              | Start sending the campaign         |
//! | GET    | `/email/count`             | Total recipients known server-side |
//! | DELETE | `/email/clear`             | Forget recipients and attachment   |
//! | GET    | `/health`                  | Health check                       |

pub mod http;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::ApiResult;

pub use http::HttpMailApi;
pub use types::*;

/// Client side of the backend REST contract.
///
/// Every method performs exactly one request. Timeouts are supplied by the
/// caller; methods without a timeout argument wait for the backend.
#[async_trait]
pub trait MailApi: Send + Sync {
    /// `POST /email/add-emails` with the whole manual set.
    async fn add_emails(
        &self,
        emails: &[String],
        timeout: Duration,
    ) -> ApiResult<ApiResponse<usize>>;

    /// `POST /email/upload` (multipart field `file`).
    async fn upload_recipients(
        &self,
        file: &FilePayload,
        timeout: Duration,
    ) -> ApiResult<ApiResponse<usize>>;

    /// `POST /email/upload-attachment` (multipart field `file`).
    async fn upload_attachment(
        &self,
        file: &FilePayload,
        timeout: Duration,
    ) -> ApiResult<ApiResponse<String>>;

    /// `GET /email/attachment-info`.
    async fn attachment_info(&self) -> ApiResult<ApiResponse<String>>;

    /// `DELETE /email/attachment`. Only the HTTP status matters.
    async fn delete_attachment(&self) -> ApiResult<()>;

    /// `POST /email/send`.
    async fn send(&self, request: &SendRequest) -> ApiResult<ApiResponse<Value>>;

    /// `GET /email/count`.
    async fn recipient_count(&self) -> ApiResult<ApiResponse<usize>>;

    /// `DELETE /email/clear`.
    async fn clear(&self) -> ApiResult<ApiResponse<Value>>;

    /// `GET /health`.
    async fn health(&self) -> ApiResult<HealthStatus>;
}
