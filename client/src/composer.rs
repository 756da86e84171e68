//! Campaign composer and sender.
//!
//! [`Campaign`] is the composition session: it owns the recipient list, the
//! recipient-file upload, the attachment, the draft, the session flags and
//! the presenter, and exposes one method per operator action.
//!
//! ```text
//! add_recipient / remove_recipient ──▶ RecipientList ──sync──┐
//! select_file / upload_file ─────────▶ RecipientFileUpload ──┼──▶ Session flags ──▶ send()
//! upload_attachment / remove ────────▶ AttachmentManager ────┘
//! ```

use std::time::Duration;

use crate::api::{FilePayload, HealthStatus, MailApi, SendRequest};
use crate::attachment::{AttachmentManager, AttachmentRef};
use crate::config::{ClientConfig, SYNC_TIMEOUT, UPLOAD_TIMEOUT};
use crate::error::{CampaignError, CampaignResult, ValidationError, ValidationResult};
use crate::presenter::{Feedback, Focus, Presenter, Stage, StatusArea, StatusLevel};
use crate::recipients::{Recipient, RecipientList, Removal};
use crate::session::{Session, SyncOperation};
use crate::upload::RecipientFileUpload;

/// Subject and message being written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CampaignDraft {
    pub subject: String,
    pub message: String,
}

impl CampaignDraft {
    /// Character counter shown under the message box.
    pub fn char_count(&self) -> usize {
        self.message.chars().count()
    }

    /// Trimmed subject and message, checked in that order.
    pub fn validate(&self) -> ValidationResult<(&str, &str)> {
        let subject = self.subject.trim();
        if subject.is_empty() {
            return Err(ValidationError::SubjectMissing);
        }
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ValidationError::MessageMissing);
        }
        Ok((subject, message))
    }

    pub fn clear(&mut self) {
        self.subject.clear();
        self.message.clear();
    }
}

/// How a confirmed or declined send ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend accepted the campaign; carries its message.
    Sent(String),
    /// The operator answered no; nothing was sent.
    Declined,
}

/// Timeouts applied by the controllers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    pub sync: Duration,
    pub upload: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { sync: SYNC_TIMEOUT, upload: UPLOAD_TIMEOUT }
    }
}

impl From<&ClientConfig> for Timeouts {
    fn from(config: &ClientConfig) -> Self {
        Self { sync: config.sync_timeout, upload: config.upload_timeout }
    }
}

/// One composition session against a backend.
pub struct Campaign<A, F> {
    api: A,
    feedback: F,
    timeouts: Timeouts,
    session: Session,
    presenter: Presenter,
    recipients: RecipientList,
    upload: RecipientFileUpload,
    attachment: AttachmentManager,
    draft: CampaignDraft,
}

impl<A: MailApi, F: Feedback> Campaign<A, F> {
    pub fn new(api: A, feedback: F) -> Self {
        Self {
            api,
            feedback,
            timeouts: Timeouts::default(),
            session: Session::new(),
            presenter: Presenter::new(),
            recipients: RecipientList::new(),
            upload: RecipientFileUpload::new(),
            attachment: AttachmentManager::new(),
            draft: CampaignDraft::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut Presenter {
        &mut self.presenter
    }

    pub fn recipients(&self) -> &RecipientList {
        &self.recipients
    }

    pub fn upload(&self) -> &RecipientFileUpload {
        &self.upload
    }

    pub fn attachment(&self) -> &AttachmentManager {
        &self.attachment
    }

    pub fn draft(&self) -> &CampaignDraft {
        &self.draft
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.draft.subject = subject.into();
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.draft.message = message.into();
    }

    // =========================================================================
    // Page load
    // =========================================================================

    /// Reconcile with state the backend kept from an earlier session:
    /// the stored attachment and the recipient total.
    pub async fn load(&mut self) {
        self.attachment.restore_on_load(&self.api, &mut self.session).await;
        self.refresh_count().await;
    }

    /// Ask the backend how many recipients it holds.
    ///
    /// A non-zero total means a list survived from an earlier session, so
    /// sending is possible without a new upload. Failures are recorded only.
    pub async fn refresh_count(&mut self) -> Option<usize> {
        match self.api.recipient_count().await {
            Ok(response) if response.success => {
                let count = response.data.unwrap_or(0);
                self.session.record_recipient_count(count);
                self.session.clear_sync_failure(SyncOperation::RecipientCount);
                if count > 0 {
                    self.session.emails_uploaded = true;
                    self.presenter.show_recipient_count(count);
                    self.presenter.advance_to(Stage::Compose);
                }
                Some(count)
            }
            Ok(response) => {
                let message = response.message_or("Count unavailable");
                self.session.record_sync_failure(SyncOperation::RecipientCount, message);
                None
            }
            Err(e) => {
                self.session.record_sync_failure(SyncOperation::RecipientCount, e.to_string());
                None
            }
        }
    }

    /// Backend health check.
    pub async fn check_health(&self) -> CampaignResult<HealthStatus> {
        Ok(self.api.health().await?)
    }

    // =========================================================================
    // Recipients
    // =========================================================================

    /// Add a manually typed recipient and sync the list.
    ///
    /// Invalid and duplicate addresses are alerted and returned as errors.
    pub async fn add_recipient(&mut self, text: &str) -> ValidationResult<Option<Recipient>> {
        let added = match self.recipients.add(text) {
            Ok(added) => added,
            Err(e) => {
                self.feedback.alert(&e.to_string());
                return Err(e);
            }
        };

        if added.is_some() {
            self.sync_recipients().await;
        }
        Ok(added)
    }

    /// Remove a manual recipient; sync only if some remain.
    pub async fn remove_recipient(&mut self, email: &str) -> Removal {
        let removal = self.recipients.remove(email);
        if removal.needs_sync() {
            self.sync_recipients().await;
        }
        removal
    }

    async fn sync_recipients(&mut self) -> Option<usize> {
        self.recipients
            .sync(&self.api, &mut self.session, &mut self.presenter, self.timeouts.sync)
            .await
    }

    /// Forget every recipient and the attachment, locally and server-side.
    pub async fn clear_recipients(&mut self) -> CampaignResult<bool> {
        if !self.feedback.confirm("Clear all recipients and the attachment from the server?") {
            return Ok(false);
        }

        let failure = match self.api.clear().await {
            Ok(response) if response.success => {
                self.recipients.clear();
                self.upload.remove_file();
                self.attachment.reset();
                self.session.reset();
                self.presenter.hide_recipient_count();
                self.presenter.show_status(
                    StatusArea::Upload,
                    StatusLevel::Success,
                    response.message_or("Email list and attachment cleared successfully"),
                );
                return Ok(true);
            }
            Ok(response) => CampaignError::Rejected(response.message_or("Failed to clear email list")),
            Err(e) => CampaignError::Api(e),
        };

        let text = match &failure {
            CampaignError::Rejected(message) => message.clone(),
            other => other.to_string(),
        };
        self.presenter.show_status(StatusArea::Upload, StatusLevel::Error, text);
        Err(failure)
    }

    // =========================================================================
    // Recipient file
    // =========================================================================

    pub fn select_file(&mut self, file: FilePayload) {
        self.upload.select(file);
    }

    pub fn remove_file(&mut self) {
        self.upload.remove_file();
    }

    pub async fn upload_file(&mut self) -> CampaignResult<usize> {
        self.upload
            .upload(&self.api, &mut self.session, &mut self.presenter, self.timeouts.upload)
            .await
    }

    // =========================================================================
    // Attachment
    // =========================================================================

    pub async fn upload_attachment(&mut self, file: FilePayload) -> CampaignResult<AttachmentRef> {
        self.attachment
            .upload(&self.api, &mut self.session, &self.feedback, file, self.timeouts.upload)
            .await
    }

    pub async fn remove_attachment(&mut self) -> bool {
        self.attachment.remove(&self.api, &mut self.session).await
    }

    // =========================================================================
    // Sending
    // =========================================================================

    /// Readiness checks, in order, with the field to bring into view.
    fn check_ready(&self) -> Result<(&str, &str), (ValidationError, Focus)> {
        if !self.session.emails_uploaded {
            return Err((ValidationError::RecipientsMissing, Focus::UploadCard));
        }
        self.draft.validate().map_err(|e| {
            let focus = match e {
                ValidationError::SubjectMissing => Focus::Subject,
                _ => Focus::Message,
            };
            (e, focus)
        })
    }

    /// Validate, confirm with the operator, then send the campaign.
    pub async fn send(&mut self) -> CampaignResult<SendOutcome> {
        self.presenter.clear_status(StatusArea::Send);

        let ready = self
            .check_ready()
            .map(|(subject, message)| (subject.to_string(), message.to_string()));

        let request = match ready {
            Ok((subject, message)) => SendRequest {
                subject,
                message,
                has_attachment: self.session.attachment_uploaded,
            },
            Err((e, focus)) => {
                self.presenter.show_status(StatusArea::Send, StatusLevel::Error, e.to_string());
                self.presenter.focus_on(focus);
                return Err(e.into());
            }
        };

        let with_attachment = if request.has_attachment { " with attachment" } else { "" };
        let question = format!(
            "Are you sure you want to send emails to all recipients{}?",
            with_attachment
        );
        if !self.feedback.confirm(&question) {
            return Ok(SendOutcome::Declined);
        }

        self.presenter.show_loader(
            "Sending emails...",
            "Please wait while we send emails to all recipients",
        );
        self.presenter.advance_to(Stage::Send);

        let result = self.api.send(&request).await;
        self.presenter.hide_loader();

        match result {
            Ok(response) if response.success => {
                let message = response.message_or("Emails sent successfully");
                log::info!("{}", message);
                self.presenter.show_success_modal(message.clone());
                self.presenter.clear_status(StatusArea::Send);
                Ok(SendOutcome::Sent(message))
            }
            Ok(response) => {
                let message = response.message_or("Failed to send emails");
                self.presenter.show_status(StatusArea::Send, StatusLevel::Error, message.clone());
                Err(CampaignError::Rejected(message))
            }
            Err(e) => {
                log::error!("Send error: {}", e);
                self.presenter.show_status(
                    StatusArea::Send,
                    StatusLevel::Error,
                    format!("Error sending emails: {}", e),
                );
                Err(e.into())
            }
        }
    }

    /// Blank the draft after confirmation, dropping the attachment too.
    /// Recipients are kept. Returns whether the form was cleared.
    pub async fn clear_form(&mut self) -> bool {
        if !self.feedback.confirm("Are you sure you want to clear the form?") {
            return false;
        }

        self.draft.clear();
        if self.session.attachment_uploaded {
            self.attachment.remove(&self.api, &mut self.session).await;
        }
        self.presenter.clear_status(StatusArea::Send);
        true
    }
}
