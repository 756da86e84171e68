//! Terminal front-end: operator dialogs, session rendering and the
//! command language of `bulkmail shell`.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::api::MailApi;
use crate::composer::Campaign;
use crate::presenter::{Feedback, Stage, StatusArea};

// =============================================================================
// Operator dialogs
// =============================================================================

/// Alerts on stderr, confirmations read from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalFeedback;

impl Feedback for TerminalFeedback {
    fn alert(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }

    fn confirm(&self, question: &str) -> bool {
        eprint!("❓ {} [y/N] ", question);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

// =============================================================================
// Rendering
// =============================================================================

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Upload => "1/3 upload recipients",
        Stage::Compose => "2/3 compose",
        Stage::Send => "3/3 send",
    }
}

/// Plain-text picture of everything the operator would see.
pub fn describe<A: MailApi, F: Feedback>(campaign: &Campaign<A, F>) -> String {
    let presenter = campaign.presenter();
    let mut out = String::new();

    let _ = writeln!(out, "📍 Stage {}", stage_label(presenter.stage()));

    let upload = campaign.upload().state();
    match upload.file() {
        Some(file) => {
            let _ = writeln!(out, "📄 Recipient file: {} ({})", file.name, upload.name());
        }
        None => {
            let _ = writeln!(out, "📄 Recipient file: none");
        }
    }
    if let Some(status) = presenter.status(StatusArea::Upload) {
        for line in status.to_string().lines() {
            let _ = writeln!(out, "   {}", line);
        }
    }
    if let Some(count) = presenter.recipient_count_text() {
        let _ = writeln!(out, "   ✔ {}", count);
    }

    let recipients = campaign.recipients();
    if !recipients.is_empty() {
        let tags: Vec<String> = recipients.iter().map(|r| format!("[{}]", r)).collect();
        let _ = writeln!(out, "✉️  Manual: {}", tags.join(" "));
    }

    match campaign.attachment().current() {
        Some(attachment) => {
            let size = attachment.size_label().unwrap_or_else(|| "size unknown".to_string());
            let _ = writeln!(out, "📎 Attachment: {} ({})", attachment.name, size);
        }
        None => {
            let _ = writeln!(out, "📎 Attachment: none");
        }
    }

    let draft = campaign.draft();
    let _ = writeln!(out, "📝 Subject: {}", draft.subject);
    let _ = writeln!(out, "📝 Message: {} chars", draft.char_count());
    if let Some(status) = presenter.status(StatusArea::Send) {
        for line in status.to_string().lines() {
            let _ = writeln!(out, "   {}", line);
        }
    }

    if let Some(loader) = presenter.loader() {
        let _ = writeln!(out, "⏳ {} {}", loader.title, loader.subtitle);
    }
    if let Some(message) = presenter.success_modal() {
        let _ = writeln!(out, "🎉 {}", message);
    }
    if let Some(failure) = campaign.session().last_sync_error() {
        let _ = writeln!(
            out,
            "   (last {} failed at {}: {})",
            failure.operation,
            failure.at.format("%H:%M:%S"),
            failure.message
        );
    }

    out
}

// =============================================================================
// Shell commands
// =============================================================================

/// One line typed in `bulkmail shell`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Remove(String),
    Select(PathBuf),
    Unselect,
    Upload,
    Attach(PathBuf),
    Detach,
    Subject(String),
    Message(String),
    Send,
    ClearForm,
    ClearAll,
    Count,
    Status,
    CloseModal,
    Help,
    Quit,
}

pub const SHELL_HELP: &str = "\
Commands:
  add <email>          add a recipient by hand
  remove <email>       remove a hand-added recipient
  select <path>        pick a recipient file (.xlsx, .xls, .csv)
  unselect             forget the picked file
  upload               upload the picked recipient file
  attach <path>        upload an attachment
  detach               remove the attachment
  subject <text>       set the subject
  message <text>       set the message (\\n for new lines)
  send                 send the campaign
  clear-form           clear subject, message and attachment
  clear-all            forget every recipient server-side
  count                refresh the server recipient count
  status               show the session
  close                dismiss the success message
  help                 this text
  quit                 leave";

impl ShellCommand {
    /// Parse a shell line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let required = |what: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("`{}` needs {}", verb, what))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match verb.to_lowercase().as_str() {
            "add" => ShellCommand::Add(required("an email address")?),
            "remove" | "rm" => ShellCommand::Remove(required("an email address")?),
            "select" => ShellCommand::Select(PathBuf::from(required("a file path")?)),
            "unselect" => ShellCommand::Unselect,
            "upload" => ShellCommand::Upload,
            "attach" => ShellCommand::Attach(PathBuf::from(required("a file path")?)),
            "detach" => ShellCommand::Detach,
            // subject and message may be set to blank on purpose
            "subject" => ShellCommand::Subject(rest.to_string()),
            "message" => ShellCommand::Message(rest.replace("\\n", "\n")),
            "send" => ShellCommand::Send,
            "clear-form" => ShellCommand::ClearForm,
            "clear-all" => ShellCommand::ClearAll,
            "count" => ShellCommand::Count,
            "status" | "ls" => ShellCommand::Status,
            "close" => ShellCommand::CloseModal,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("Unknown command `{}` (try `help`)", other)),
        };

        Ok(Some(command))
    }
}
