//! Error types for the campaign workflow.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ValidationError`] - Local checks that never reach the network
//! - [`ApiError`] - Transport and protocol failures talking to the backend
//! - [`ConfigError`] - Invalid environment configuration
//! - [`CampaignError`] - Top-level errors returned by the front-end
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors detected locally before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Text does not look like an email address.
    #[error("Please enter a valid email address")]
    InvalidEmail(String),

    /// Email already present in the manual recipient set.
    #[error("This email has already been added")]
    DuplicateEmail(String),

    /// Upload requested with nothing selected.
    #[error("Please select a file first")]
    NoFileSelected,

    /// Recipient file is not a spreadsheet or CSV.
    #[error("Please upload a valid Excel (.xlsx, .xls) or CSV (.csv) file")]
    UnsupportedFileType(String),

    /// Send requested before any recipients reached the backend.
    #[error("Please upload a file with email addresses first")]
    RecipientsMissing,

    /// Blank subject.
    #[error("Please enter email subject")]
    SubjectMissing,

    /// Blank message body.
    #[error("Please enter email message")]
    MessageMissing,
}

// =============================================================================
// API Errors
// =============================================================================

/// Failures of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The client-side timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The backend could not be reached at all.
    #[error("Failed to connect: {0}")]
    Unreachable(String),

    /// Non-OK status without a JSON envelope.
    #[error("Server returned {status}: {reason}")]
    Status { status: u16, reason: String },

    /// Body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Any other request failure.
    #[error("{0}")]
    Request(String),
}

impl ApiError {
    /// Message shown when a recipient-file upload fails in transport.
    pub fn upload_message(&self) -> String {
        match self {
            ApiError::Timeout => {
                "Upload timeout - file might be too large or server is slow".to_string()
            }
            ApiError::Unreachable(_) => {
                "Cannot connect to server. Please check if the app is running.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Message shown when an attachment upload fails in transport.
    pub fn attachment_message(&self) -> String {
        match self {
            ApiError::Timeout => "Upload timeout - file might be too large".to_string(),
            ApiError::Unreachable(_) => "Cannot connect to server".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unreachable(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },

    /// The backend URL is empty.
    #[error("Backend URL must not be empty")]
    EmptyBackendUrl,
}

// =============================================================================
// Campaign Errors (top-level)
// =============================================================================

/// Top-level errors surfaced by the front-end.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// Local validation failure.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backend call failure.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration failure.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The backend answered `success: false`.
    #[error("Server rejected request: {0}")]
    Rejected(String),

    /// Reading a local file failed.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for local validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for front-end operations.
pub type CampaignResult<T> = Result<T, CampaignError>;
