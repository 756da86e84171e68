//! Manually entered recipients.
//!
//! The list lives only in the session. Every add, and every remove that
//! leaves the list non-empty, pushes the whole list to the backend with
//! [`RecipientList::sync`]. Emptying the list does not tell the backend.

use std::fmt;
use std::time::Duration;

use crate::api::MailApi;
use crate::error::{ValidationError, ValidationResult};
use crate::presenter::{Presenter, Stage};
use crate::session::{Session, SyncOperation};
use crate::validation::is_valid_email;

/// A validated recipient address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Recipient(String);

impl Recipient {
    /// Validate an already trimmed address.
    pub fn parse(email: &str) -> ValidationResult<Self> {
        if is_valid_email(email) {
            Ok(Self(email.to_string()))
        } else {
            Err(ValidationError::InvalidEmail(email.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Recipient {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Result of [`RecipientList::remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// The address was not in the list.
    NotPresent,
    /// Removed; `remaining` addresses are left.
    Removed { remaining: usize },
}

impl Removal {
    /// Whether the backend should be told about the new list.
    pub fn needs_sync(&self) -> bool {
        matches!(self, Removal::Removed { remaining } if *remaining > 0)
    }
}

/// Insertion-ordered, duplicate-free manual recipient set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientList {
    recipients: Vec<Recipient>,
    input: String,
}

impl RecipientList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content of the entry field.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Add `text` after trimming.
    ///
    /// Returns `Ok(None)` for blank input. On success the entry field is
    /// cleared; on error it keeps the text so the operator can fix it.
    pub fn add(&mut self, text: &str) -> ValidationResult<Option<Recipient>> {
        let email = text.trim();
        if email.is_empty() {
            return Ok(None);
        }

        self.input = text.to_string();
        let recipient = Recipient::parse(email)?;
        if self.contains(email) {
            return Err(ValidationError::DuplicateEmail(email.to_string()));
        }

        self.recipients.push(recipient.clone());
        self.input.clear();
        Ok(Some(recipient))
    }

    /// Remove the exact match of `email`.
    pub fn remove(&mut self, email: &str) -> Removal {
        match self.recipients.iter().position(|r| r.as_str() == email) {
            Some(index) => {
                self.recipients.remove(index);
                Removal::Removed { remaining: self.recipients.len() }
            }
            None => Removal::NotPresent,
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.recipients.iter().any(|r| r.as_str() == email)
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.iter()
    }

    /// Drop every address locally.
    pub fn clear(&mut self) {
        self.recipients.clear();
        self.input.clear();
    }

    fn to_strings(&self) -> Vec<String> {
        self.recipients.iter().map(|r| r.0.clone()).collect()
    }

    /// Push the whole list to the backend.
    ///
    /// Failures are recorded on the session and logged; they never reach
    /// the operator. Returns the recipient total on success.
    pub async fn sync<A: MailApi + ?Sized>(
        &self,
        api: &A,
        session: &mut Session,
        presenter: &mut Presenter,
        timeout: Duration,
    ) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        match api.add_emails(&self.to_strings(), timeout).await {
            Ok(response) if response.success => {
                let count = response.data.unwrap_or(0);
                session.emails_uploaded = true;
                session.record_recipient_count(count);
                session.clear_sync_failure(SyncOperation::Recipients);
                presenter.show_recipient_count(count);
                presenter.advance_to(Stage::Compose);
                log::info!("Synced {} manual recipients ({} total)", self.len(), count);
                Some(count)
            }
            Ok(response) => {
                let message = response.message_or("Recipient sync rejected");
                session.record_sync_failure(SyncOperation::Recipients, message);
                None
            }
            Err(e) => {
                session.record_sync_failure(SyncOperation::Recipients, e.to_string());
                None
            }
        }
    }
}
