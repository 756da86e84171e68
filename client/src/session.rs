//! Composition session context.
//!
//! Holds the readiness flags read by the sender, the last recipient count
//! reported by the backend, and the last failed background reconciliation.

use chrono::{DateTime, Utc};
use std::fmt;

/// Background calls whose failures are recorded instead of shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOperation {
    /// `POST /email/add-emails`
    Recipients,
    /// `DELETE /email/attachment`
    AttachmentRemoval,
    /// `GET /email/attachment-info`
    AttachmentRestore,
    /// `GET /email/count`
    RecipientCount,
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncOperation::Recipients => "recipient sync",
            SyncOperation::AttachmentRemoval => "attachment removal",
            SyncOperation::AttachmentRestore => "attachment restore",
            SyncOperation::RecipientCount => "recipient count",
        };
        f.write_str(name)
    }
}

/// A failed reconciliation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncFailure {
    pub operation: SyncOperation,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Per-session readiness state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    /// The backend holds at least one recipient list for this session
    pub emails_uploaded: bool,
    /// The backend holds an attachment
    pub attachment_uploaded: bool,
    /// Total recipients last reported by the backend
    pub recipient_count: Option<usize>,
    last_sync_error: Option<SyncFailure>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recipient count reported by the backend. Last writer wins.
    pub fn record_recipient_count(&mut self, count: usize) {
        self.recipient_count = Some(count);
    }

    /// Remember a swallowed failure. It is logged, never shown.
    pub fn record_sync_failure(&mut self, operation: SyncOperation, message: impl Into<String>) {
        let message = message.into();
        log::warn!("Error during {}: {}", operation, message);
        self.last_sync_error = Some(SyncFailure { operation, message, at: Utc::now() });
    }

    /// Forget the recorded failure once the same operation succeeds.
    pub fn clear_sync_failure(&mut self, operation: SyncOperation) {
        if self.last_sync_error.as_ref().map(|f| f.operation) == Some(operation) {
            self.last_sync_error = None;
        }
    }

    pub fn last_sync_error(&self) -> Option<&SyncFailure> {
        self.last_sync_error.as_ref()
    }

    /// Back to a fresh session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
