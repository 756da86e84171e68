//! Recipient-file upload controller.
//!
//! ```text
//! Idle ──select──▶ FileSelected ──upload──▶ Uploading ──▶ Uploaded
//!   ▲                                                 └──▶ Failed
//!   └──────────────────── remove_file ◀── (any state)
//! ```
//!
//! A file can be uploaded again from `Uploaded` or `Failed`: the picked
//! file stays selected until it is removed or replaced.

use std::time::Duration;

use crate::api::{FilePayload, MailApi};
use crate::error::{CampaignError, CampaignResult, ValidationError, ValidationResult};
use crate::presenter::{Focus, Presenter, Stage, StatusArea, StatusLevel};
use crate::session::Session;
use crate::validation::is_supported_recipient_file;

/// Lifecycle of the recipient file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    FileSelected(FilePayload),
    Uploading(FilePayload),
    Uploaded { file: FilePayload, count: usize },
    Failed { file: FilePayload, reason: String },
}

impl UploadState {
    /// The file currently picked, whatever the phase.
    pub fn file(&self) -> Option<&FilePayload> {
        match self {
            UploadState::Idle => None,
            UploadState::FileSelected(file)
            | UploadState::Uploading(file)
            | UploadState::Uploaded { file, .. }
            | UploadState::Failed { file, .. } => Some(file),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::FileSelected(_) => "file selected",
            UploadState::Uploading(_) => "uploading",
            UploadState::Uploaded { .. } => "uploaded",
            UploadState::Failed { .. } => "failed",
        }
    }
}

/// Owns the recipient-file upload lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientFileUpload {
    state: UploadState,
}

impl RecipientFileUpload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Pick a file. Nothing is sent until [`upload`](Self::upload).
    pub fn select(&mut self, file: FilePayload) {
        log::debug!("Selected recipient file {}", file.name);
        self.state = UploadState::FileSelected(file);
    }

    /// Forget the picked file. The backend keeps whatever it already has.
    pub fn remove_file(&mut self) {
        self.state = UploadState::Idle;
    }

    /// Check the picked file and enter `Uploading`.
    pub fn begin(&mut self) -> ValidationResult<FilePayload> {
        let file = self.state.file().cloned().ok_or(ValidationError::NoFileSelected)?;
        if !is_supported_recipient_file(&file.name) {
            return Err(ValidationError::UnsupportedFileType(file.name));
        }
        self.state = UploadState::Uploading(file.clone());
        Ok(file)
    }

    /// `Uploading` → `Uploaded`.
    pub fn complete(&mut self, count: usize) {
        if let UploadState::Uploading(file) = std::mem::take(&mut self.state) {
            self.state = UploadState::Uploaded { file, count };
        }
    }

    /// `Uploading` → `Failed`.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if let UploadState::Uploading(file) = std::mem::take(&mut self.state) {
            self.state = UploadState::Failed { file, reason: reason.into() };
        }
    }

    /// Validate and upload the picked file, rendering the outcome.
    pub async fn upload<A: MailApi + ?Sized>(
        &mut self,
        api: &A,
        session: &mut Session,
        presenter: &mut Presenter,
        timeout: Duration,
    ) -> CampaignResult<usize> {
        presenter.clear_status(StatusArea::Upload);
        presenter.hide_recipient_count();

        let file = match self.begin() {
            Ok(file) => file,
            Err(e) => {
                presenter.show_status(StatusArea::Upload, StatusLevel::Error, e.to_string());
                return Err(e.into());
            }
        };

        presenter.show_status(
            StatusArea::Upload,
            StatusLevel::Info,
            "Uploading and processing file...",
        );

        match api.upload_recipients(&file, timeout).await {
            Ok(response) if response.success => {
                let count = response.data.unwrap_or(0);
                presenter.show_status(
                    StatusArea::Upload,
                    StatusLevel::Success,
                    response.message_or("File uploaded successfully"),
                );
                presenter.show_recipient_count(count);
                presenter.advance_to(Stage::Compose);
                presenter.focus_on(Focus::ComposeCard);
                session.emails_uploaded = true;
                session.record_recipient_count(count);
                self.complete(count);
                log::info!("Uploaded {}: {} recipients", file.name, count);
                Ok(count)
            }
            Ok(response) => {
                let message = response.message_or("Failed to upload file");
                presenter.show_status(StatusArea::Upload, StatusLevel::Error, message.clone());
                session.emails_uploaded = false;
                self.fail(message.clone());
                Err(CampaignError::Rejected(message))
            }
            Err(e) => {
                log::error!("Upload error: {}", e);
                let message = e.upload_message();
                presenter.show_status(StatusArea::Upload, StatusLevel::Error, message.clone());
                session.emails_uploaded = false;
                self.fail(message);
                Err(e.into())
            }
        }
    }
}
