//! Campaign attachment manager.
//!
//! At most one attachment exists per session:
//!
//! ```text
//! None ──upload──▶ Uploading ──ok──▶ Present ──remove──▶ Removing ──ok──▶ None
//!                      └──error──▶ (previous state)            └──error──▶ Present
//! ```
//!
//! The picker (file input) is visible whenever no attachment is present.

use std::time::Duration;

use crate::api::{FilePayload, MailApi};
use crate::error::{CampaignError, CampaignResult};
use crate::presenter::Feedback;
use crate::session::{Session, SyncOperation};
use crate::validation::format_file_size;

/// The attachment stored by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Name reported by the backend
    pub name: String,
    /// Local size, unknown when restored from the backend
    pub size_bytes: Option<u64>,
}

impl AttachmentRef {
    pub fn size_label(&self) -> Option<String> {
        self.size_bytes.map(format_file_size)
    }
}

/// Lifecycle of the attachment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AttachmentState {
    #[default]
    None,
    Uploading { file_name: String, previous: Option<AttachmentRef> },
    Present(AttachmentRef),
    Removing(AttachmentRef),
}

/// Owns the single-attachment lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachmentManager {
    state: AttachmentState,
    picker: Option<String>,
}

impl AttachmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AttachmentState {
        &self.state
    }

    /// The attachment currently stored, if any.
    pub fn current(&self) -> Option<&AttachmentRef> {
        match &self.state {
            AttachmentState::Present(attachment) | AttachmentState::Removing(attachment) => {
                Some(attachment)
            }
            AttachmentState::Uploading { previous, .. } => previous.as_ref(),
            AttachmentState::None => None,
        }
    }

    pub fn picker_visible(&self) -> bool {
        !matches!(self.state, AttachmentState::Present(_) | AttachmentState::Removing(_))
    }

    /// File name held by the picker input, cleared after a failed upload.
    pub fn picker_value(&self) -> Option<&str> {
        self.picker.as_deref()
    }

    /// Upload `file` as the campaign attachment, replacing any previous one.
    ///
    /// Failures are alerted to the operator and clear the picker so the
    /// same file can be picked again.
    pub async fn upload<A, F>(
        &mut self,
        api: &A,
        session: &mut Session,
        feedback: &F,
        file: FilePayload,
        timeout: Duration,
    ) -> CampaignResult<AttachmentRef>
    where
        A: MailApi + ?Sized,
        F: Feedback + ?Sized,
    {
        self.picker = Some(file.name.clone());
        let previous = self.current().cloned();
        self.state = AttachmentState::Uploading { file_name: file.name.clone(), previous };

        let (error, message) = match api.upload_attachment(&file, timeout).await {
            Ok(response) if response.success => {
                let attachment = AttachmentRef {
                    name: response.data.unwrap_or_else(|| file.name.clone()),
                    size_bytes: Some(file.size()),
                };
                log::info!("Attachment uploaded: {}", attachment.name);
                self.state = AttachmentState::Present(attachment.clone());
                session.attachment_uploaded = true;
                return Ok(attachment);
            }
            Ok(response) => {
                let reason = response.message_or("Unknown error");
                let message = format!("Failed to upload attachment: {}", reason);
                (CampaignError::Rejected(reason), message)
            }
            Err(e) => {
                log::error!("Attachment upload error: {}", e);
                let message = e.attachment_message();
                (CampaignError::Api(e), message)
            }
        };

        feedback.alert(&message);
        self.picker = None;
        self.state = match std::mem::take(&mut self.state) {
            AttachmentState::Uploading { previous: Some(attachment), .. } => {
                AttachmentState::Present(attachment)
            }
            _ => AttachmentState::None,
        };
        Err(error)
    }

    /// Ask the backend to drop the attachment.
    ///
    /// Local state changes only on an OK status. Any failure is logged and
    /// recorded on the session. Returns whether the attachment was removed.
    pub async fn remove<A: MailApi + ?Sized>(&mut self, api: &A, session: &mut Session) -> bool {
        let previous = std::mem::take(&mut self.state);
        if let AttachmentState::Present(attachment) = &previous {
            self.state = AttachmentState::Removing(attachment.clone());
        }

        match api.delete_attachment().await {
            Ok(()) => {
                log::info!("Attachment removed");
                self.state = AttachmentState::None;
                self.picker = None;
                session.attachment_uploaded = false;
                session.clear_sync_failure(SyncOperation::AttachmentRemoval);
                true
            }
            Err(e) => {
                session.record_sync_failure(SyncOperation::AttachmentRemoval, e.to_string());
                self.state = previous;
                false
            }
        }
    }

    /// Reconcile with an attachment stored before this session started.
    pub async fn restore_on_load<A: MailApi + ?Sized>(
        &mut self,
        api: &A,
        session: &mut Session,
    ) -> Option<&AttachmentRef> {
        match api.attachment_info().await {
            Ok(response) => {
                session.clear_sync_failure(SyncOperation::AttachmentRestore);
                let stored = if response.success { response.data } else { None };
                // a blank name means nothing is stored
                let stored = stored.filter(|name| !name.is_empty());
                match stored {
                    Some(name) => {
                        log::info!("Restored attachment {}", name);
                        self.state = AttachmentState::Present(AttachmentRef { name, size_bytes: None });
                        session.attachment_uploaded = true;
                    }
                    None => {
                        self.state = AttachmentState::None;
                        session.attachment_uploaded = false;
                    }
                }
            }
            Err(e) => {
                session.record_sync_failure(SyncOperation::AttachmentRestore, e.to_string());
            }
        }
        self.current()
    }

    /// Forget the attachment locally after the backend dropped it.
    pub fn reset(&mut self) {
        self.state = AttachmentState::None;
        self.picker = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Endpoint, FakeApi};
    use crate::error::ApiError;
    use crate::presenter::testing::ScriptedFeedback;
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn pdf() -> FilePayload {
        FilePayload::new("brochure.pdf", vec![0u8; 2048])
    }

    #[tokio::test]
    async fn test_upload_success() {
        let api = FakeApi::new();
        api.ok(Endpoint::UploadAttachment, "Attachment uploaded successfully", json!("brochure.pdf"));
        let feedback = ScriptedFeedback::default();
        let mut manager = AttachmentManager::new();
        let mut session = Session::new();

        let attachment = manager
            .upload(&api, &mut session, &feedback, pdf(), TIMEOUT)
            .await
            .unwrap();

        assert_eq!(attachment.name, "brochure.pdf");
        assert_eq!(attachment.size_label().as_deref(), Some("2.00 KB"));
        assert!(session.attachment_uploaded);
        assert!(!manager.picker_visible());
        assert!(feedback.alerts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_upload_timeout_clears_picker() {
        let api = FakeApi::new();
        api.fail(Endpoint::UploadAttachment, ApiError::Timeout);
        let feedback = ScriptedFeedback::default();
        let mut manager = AttachmentManager::new();
        let mut session = Session::new();

        let result = manager.upload(&api, &mut session, &feedback, pdf(), TIMEOUT).await;

        assert!(matches!(result, Err(CampaignError::Api(ApiError::Timeout))));
        assert_eq!(
            feedback.alerts.borrow().as_slice(),
            ["Upload timeout - file might be too large"]
        );
        assert_eq!(manager.picker_value(), None);
        assert_eq!(manager.state(), &AttachmentState::None);
        assert!(!session.attachment_uploaded);
    }

    #[tokio::test]
    async fn test_upload_rejection_alerts_server_message() {
        let api = FakeApi::new();
        api.reject(Endpoint::UploadAttachment, "Please select a file to upload");
        let feedback = ScriptedFeedback::default();
        let mut manager = AttachmentManager::new();
        let mut session = Session::new();

        let result = manager.upload(&api, &mut session, &feedback, pdf(), TIMEOUT).await;

        assert!(matches!(result, Err(CampaignError::Rejected(_))));
        assert_eq!(
            feedback.alerts.borrow()[0],
            "Failed to upload attachment: Please select a file to upload"
        );
        assert!(manager.current().is_none());
    }

    #[tokio::test]
    async fn test_failed_replacement_keeps_previous() {
        let api = FakeApi::new();
        api.ok(Endpoint::UploadAttachment, "ok", json!("first.pdf"));
        api.fail(Endpoint::UploadAttachment, ApiError::Unreachable("refused".into()));
        let feedback = ScriptedFeedback::default();
        let mut manager = AttachmentManager::new();
        let mut session = Session::new();

        manager.upload(&api, &mut session, &feedback, pdf(), TIMEOUT).await.unwrap();
        let second = FilePayload::new("second.pdf", vec![1u8; 10]);
        assert!(manager.upload(&api, &mut session, &feedback, second, TIMEOUT).await.is_err());

        assert_eq!(manager.current().unwrap().name, "first.pdf");
        assert!(session.attachment_uploaded);
        assert_eq!(feedback.alerts.borrow()[0], "Cannot connect to server");
    }

    #[tokio::test]
    async fn test_remove_only_on_ok_status() {
        let api = FakeApi::new();
        api.ok(Endpoint::UploadAttachment, "ok", json!("brochure.pdf"));
        api.fail(
            Endpoint::DeleteAttachment,
            ApiError::Status { status: 500, reason: "Internal Server Error".into() },
        );
        api.respond(Endpoint::DeleteAttachment, Ok(serde_json::Value::Null));
        let feedback = ScriptedFeedback::default();
        let mut manager = AttachmentManager::new();
        let mut session = Session::new();
        manager.upload(&api, &mut session, &feedback, pdf(), TIMEOUT).await.unwrap();

        assert!(!manager.remove(&api, &mut session).await);
        assert!(session.attachment_uploaded);
        assert!(matches!(manager.state(), AttachmentState::Present(_)));
        assert_eq!(
            session.last_sync_error().unwrap().operation,
            SyncOperation::AttachmentRemoval
        );
        assert!(feedback.alerts.borrow().is_empty());

        assert!(manager.remove(&api, &mut session).await);
        assert!(!session.attachment_uploaded);
        assert_eq!(manager.state(), &AttachmentState::None);
        assert!(manager.picker_visible());
        assert!(session.last_sync_error().is_none());
    }

    #[tokio::test]
    async fn test_restore_on_load() {
        let api = FakeApi::new();
        api.ok(Endpoint::AttachmentInfo, "Attachment available", json!("terms.pdf"));
        let mut manager = AttachmentManager::new();
        let mut session = Session::new();

        let restored = manager.restore_on_load(&api, &mut session).await.cloned();

        assert_eq!(restored, Some(AttachmentRef { name: "terms.pdf".into(), size_bytes: None }));
        assert!(session.attachment_uploaded);
        assert!(!manager.picker_visible());
    }

    #[tokio::test]
    async fn test_restore_without_attachment() {
        let api = FakeApi::new();
        api.respond(
            Endpoint::AttachmentInfo,
            Ok(json!({ "success": false, "message": "No attachment uploaded", "data": null })),
        );
        let mut manager = AttachmentManager::new();
        let mut session = Session::new();

        assert!(manager.restore_on_load(&api, &mut session).await.is_none());
        assert!(!session.attachment_uploaded);
    }

    #[tokio::test]
    async fn test_restore_ignores_blank_name() {
        let api = FakeApi::new();
        api.ok(Endpoint::AttachmentInfo, "Attachment available", json!(""));
        let mut manager = AttachmentManager::new();
        let mut session = Session::new();

        assert!(manager.restore_on_load(&api, &mut session).await.is_none());
        assert!(!session.attachment_uploaded);
        assert_eq!(manager.state(), &AttachmentState::None);
    }

    #[tokio::test]
    async fn test_restore_failure_is_recorded() {
        let api = FakeApi::new();
        api.fail(Endpoint::AttachmentInfo, ApiError::Unreachable("refused".into()));
        let mut manager = AttachmentManager::new();
        let mut session = Session::new();

        assert!(manager.restore_on_load(&api, &mut session).await.is_none());
        assert_eq!(
            session.last_sync_error().unwrap().operation,
            SyncOperation::AttachmentRestore
        );
    }
}
