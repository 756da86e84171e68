//! Status and feedback presentation.
//!
//! The [`Presenter`] only holds what is currently visible: one status banner
//! per area, the recipient-count banner, the blocking loader, the success
//! modal, the workflow stage and the last focus cue. Front-ends read it
//! after every action and draw it however they like.
//!
//! Blocking interactions (alerts and yes/no confirmations) go through the
//! [`Feedback`] trait, because only the front-end can talk to the operator.

use std::fmt;

// =============================================================================
// Status Banner
// =============================================================================

/// Banner severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    /// Work in progress
    Info,
    /// Operation completed
    Success,
    /// Operation failed
    Error,
}

impl StatusLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusLevel::Info => "status-message info",
            StatusLevel::Success => "status-message success",
            StatusLevel::Error => "status-message error",
        }
    }

    /// Get emoji prefix for display.
    pub fn emoji(&self) -> &'static str {
        match self {
            StatusLevel::Info => "⏳",
            StatusLevel::Success => "✅",
            StatusLevel::Error => "❌",
        }
    }
}

/// Where a banner is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusArea {
    /// Under the recipient-file upload card
    Upload,
    /// Under the compose card
    Send,
}

/// A status banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    /// Banner markup: emoji prefix, newlines turned into `<br>`.
    pub fn html(&self) -> String {
        format!("{} {}", self.level.emoji(), self.text.replace('\n', "<br>"))
    }

    /// Banner lines for plain-text renderers.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.emoji(), self.text)
    }
}

// =============================================================================
// Stage, Focus, Loader
// =============================================================================

/// Workflow step indicator. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Upload = 1,
    Compose = 2,
    Send = 3,
}

/// Element the front-end should scroll to or focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    UploadCard,
    ComposeCard,
    Subject,
    Message,
    Status(StatusArea),
}

/// Blocking overlay shown while a send is in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loader {
    pub title: String,
    pub subtitle: String,
}

// =============================================================================
// Presenter
// =============================================================================

/// Visible feedback state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presenter {
    upload_status: Option<StatusMessage>,
    send_status: Option<StatusMessage>,
    recipient_count: Option<usize>,
    loader: Option<Loader>,
    success_modal: Option<String>,
    stage: Stage,
    focus: Option<Focus>,
}

impl Default for Presenter {
    fn default() -> Self {
        Self {
            upload_status: None,
            send_status: None,
            recipient_count: None,
            loader: None,
            success_modal: None,
            stage: Stage::Upload,
            focus: None,
        }
    }
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a banner in `area` and scroll it into view.
    pub fn show_status(&mut self, area: StatusArea, level: StatusLevel, text: impl Into<String>) {
        let message = StatusMessage { level, text: text.into() };
        match level {
            StatusLevel::Error => log::warn!("{}", message),
            _ => log::info!("{}", message),
        }
        *self.slot(area) = Some(message);
        self.focus = Some(Focus::Status(area));
    }

    pub fn clear_status(&mut self, area: StatusArea) {
        *self.slot(area) = None;
    }

    pub fn status(&self, area: StatusArea) -> Option<&StatusMessage> {
        match area {
            StatusArea::Upload => self.upload_status.as_ref(),
            StatusArea::Send => self.send_status.as_ref(),
        }
    }

    fn slot(&mut self, area: StatusArea) -> &mut Option<StatusMessage> {
        match area {
            StatusArea::Upload => &mut self.upload_status,
            StatusArea::Send => &mut self.send_status,
        }
    }

    pub fn show_recipient_count(&mut self, count: usize) {
        self.recipient_count = Some(count);
    }

    pub fn hide_recipient_count(&mut self) {
        self.recipient_count = None;
    }

    /// Text of the recipient-count banner, if visible.
    pub fn recipient_count_text(&self) -> Option<String> {
        self.recipient_count
            .map(|count| format!("{} email addresses loaded and ready to send!", count))
    }

    pub fn show_loader(&mut self, title: impl Into<String>, subtitle: impl Into<String>) {
        self.loader = Some(Loader { title: title.into(), subtitle: subtitle.into() });
    }

    pub fn hide_loader(&mut self) {
        self.loader = None;
    }

    pub fn loader(&self) -> Option<&Loader> {
        self.loader.as_ref()
    }

    pub fn show_success_modal(&mut self, message: impl Into<String>) {
        self.success_modal = Some(message.into());
    }

    pub fn close_success_modal(&mut self) {
        self.success_modal = None;
    }

    pub fn success_modal(&self) -> Option<&str> {
        self.success_modal.as_deref()
    }

    /// Light up `stage` (and every stage before it).
    pub fn advance_to(&mut self, stage: Stage) {
        self.stage = self.stage.max(stage);
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn focus_on(&mut self, focus: Focus) {
        self.focus = Some(focus);
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    /// Consume the pending focus cue.
    pub fn take_focus(&mut self) -> Option<Focus> {
        self.focus.take()
    }
}

// =============================================================================
// Operator Feedback
// =============================================================================

/// Blocking dialogs owned by the front-end.
pub trait Feedback {
    /// Modal alert the operator has to acknowledge.
    fn alert(&self, message: &str);

    /// Yes/no question. `true` means the operator agreed.
    fn confirm(&self, question: &str) -> bool;
}

/// Feedback for unattended runs: every question is answered yes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Feedback for AutoConfirm {
    fn alert(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn confirm(&self, question: &str) -> bool {
        log::info!("{} yes", question);
        true
    }
}
