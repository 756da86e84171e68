//! # Bulkmail - campaign composition client
//!
//! Bulkmail drives a bulk email campaign against a mail-sending backend:
//! recipients come from an uploaded spreadsheet/CSV or are typed by hand,
//! an optional attachment is stored server-side, and the campaign is sent
//! once the operator confirms.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────────────────────┐   ┌───────────┐
//! │  Front-end   │──▶│ Campaign (composer & sender)         │──▶│  MailApi  │──▶ backend
//! │ (terminal)   │◀──│  ├── RecipientList      (manual)     │   │ (reqwest) │
//! │  Feedback    │   │  ├── RecipientFileUpload (file)      │   └───────────┘
//! └──────────────┘   │  ├── AttachmentManager               │
//!                    │  ├── Session   (readiness flags)     │
//!                    │  └── Presenter (visible feedback)    │
//!                    └──────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bulkmail::{AutoConfirm, Campaign, ClientConfig, FilePayload, HttpMailApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let mut campaign = Campaign::new(HttpMailApi::new(config), AutoConfirm);
//!
//!     campaign.select_file(FilePayload::from_path("recipients.csv").await?);
//!     campaign.upload_file().await?;
//!     campaign.set_subject("Spring newsletter");
//!     campaign.set_message("Hello!");
//!     campaign.send().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Defaults and environment configuration
//! - [`validation`] - Email, file-type and size helpers
//! - [`api`] - Backend REST contract and HTTP client
//! - [`session`] - Readiness flags and reconciliation failures
//! - [`presenter`] - Visible feedback state and operator dialogs
//! - [`recipients`] - Manual recipient list
//! - [`upload`] - Recipient-file upload state machine
//! - [`attachment`] - Attachment state machine
//! - [`composer`] - Draft, send and the session aggregate
//! - [`terminal`] - Terminal front-end helpers

// Core modules
pub mod config;
pub mod error;
pub mod validation;

// Backend
pub mod api;

// Workflow
pub mod attachment;
pub mod composer;
pub mod presenter;
pub mod recipients;
pub mod session;
pub mod upload;

// Front-end
pub mod logging;
pub mod terminal;

// =============================================================================
// Re-exports - Errors & Config
// =============================================================================

pub use error::{
    ApiError, ApiResult, CampaignError, CampaignResult, ConfigError, ValidationError,
    ValidationResult,
};

pub use config::{ClientConfig, API_BASE_PATH, DEFAULT_BACKEND_URL, SYNC_TIMEOUT, UPLOAD_TIMEOUT};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{format_file_size, is_supported_recipient_file, is_valid_email};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::{ApiResponse, FilePayload, HealthStatus, HttpMailApi, MailApi, SendRequest};

// =============================================================================
// Re-exports - Workflow
// =============================================================================

pub use attachment::{AttachmentManager, AttachmentRef, AttachmentState};
pub use composer::{Campaign, CampaignDraft, SendOutcome, Timeouts};
pub use presenter::{
    AutoConfirm, Feedback, Focus, Loader, Presenter, Stage, StatusArea, StatusLevel,
    StatusMessage,
};
pub use recipients::{Recipient, RecipientList, Removal};
pub use session::{Session, SyncFailure, SyncOperation};
pub use upload::{RecipientFileUpload, UploadState};
