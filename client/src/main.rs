//! Bulkmail CLI - compose and send bulk email campaigns
//!
//! # Commands
//!
//! ```bash
//! bulkmail status                                   # Backend health, recipients, attachment
//! bulkmail send --file list.csv --subject S --message M [--attach f.pdf] [--yes]
//! bulkmail clear [--yes]                            # Forget recipients and attachment
//! bulkmail shell                                    # Interactive composition session
//! ```
//!
//! The backend URL comes from `--backend`, `BULKMAIL_BACKEND_URL` or the
//! default `http://localhost:8080`.

use clap::{Args, Parser, Subcommand};
use bulkmail::terminal::{describe, ShellCommand, TerminalFeedback, SHELL_HELP};
use bulkmail::{
    logging, AutoConfirm, Campaign, CampaignError, ClientConfig, Feedback, FilePayload,
    HttpMailApi, Removal, SendOutcome, Timeouts,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bulkmail")]
#[command(about = "Compose and send bulk email campaigns", long_about = None)]
struct Cli {
    /// Backend base URL (overrides BULKMAIL_BACKEND_URL)
    #[arg(short, long, global = true)]
    backend: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show backend health, recipient count and stored attachment
    Status,

    /// Run a whole campaign in one go
    Send(SendArgs),

    /// Forget every recipient and the attachment on the backend
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactive composition session
    Shell,
}

#[derive(Args)]
struct SendArgs {
    /// Recipient file (.xlsx, .xls or .csv)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Extra recipient typed by hand (repeatable)
    #[arg(short, long = "email")]
    emails: Vec<String>,

    /// File attached to every email
    #[arg(short, long)]
    attach: Option<PathBuf>,

    /// Email subject
    #[arg(short, long)]
    subject: String,

    /// Email message
    #[arg(short, long, conflicts_with = "message_file")]
    message: Option<String>,

    /// Read the message from a file
    #[arg(long)]
    message_file: Option<PathBuf>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.verbose);

    let result = match load_config(cli.backend.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Status => cmd_status(config).await,
            Commands::Send(args) => cmd_send(config, args).await,
            Commands::Clear { yes } => cmd_clear(config, yes).await,
            Commands::Shell => cmd_shell(config).await,
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(backend: Option<&str>) -> Result<ClientConfig, CampaignError> {
    let config = ClientConfig::from_env()?;
    match backend {
        Some(url) => Ok(config.with_backend_url(url)?),
        None => Ok(config),
    }
}

fn new_campaign<F: Feedback>(config: &ClientConfig, feedback: F) -> Campaign<HttpMailApi, F> {
    Campaign::new(HttpMailApi::new(config.clone()), feedback).with_timeouts(Timeouts::from(config))
}

async fn cmd_status(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔎 Backend: {}", config.backend_url);

    let mut campaign = new_campaign(&config, TerminalFeedback);
    let health = campaign.check_health().await?;
    eprintln!(
        "   Health: {} ({})",
        health.status,
        health.service.as_deref().unwrap_or("unknown service")
    );

    campaign.load().await;
    match campaign.session().recipient_count {
        Some(count) => eprintln!("   Recipients on server: {}", count),
        None => eprintln!("   Recipients on server: unknown"),
    }
    print!("{}", describe(&campaign));

    Ok(())
}

async fn cmd_send(config: ClientConfig, args: SendArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.yes {
        run_send(new_campaign(&config, AutoConfirm), args).await
    } else {
        run_send(new_campaign(&config, TerminalFeedback), args).await
    }
}

async fn run_send<F: Feedback>(
    mut campaign: Campaign<HttpMailApi, F>,
    args: SendArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let message = match (args.message, args.message_file) {
        (Some(message), _) => message,
        (None, Some(path)) => fs::read_to_string(&path)?,
        (None, None) => return Err("either --message or --message-file is required".into()),
    };

    campaign.load().await;

    if let Some(path) = args.file {
        eprintln!("📤 Uploading recipients: {}", path.display());
        campaign.select_file(FilePayload::from_path(&path).await?);
        if let Err(e) = campaign.upload_file().await {
            print!("{}", describe(&campaign));
            return Err(e.into());
        }
    }

    for email in &args.emails {
        campaign.add_recipient(email).await?;
    }

    if let Some(path) = args.attach {
        eprintln!("📎 Uploading attachment: {}", path.display());
        campaign.upload_attachment(FilePayload::from_path(&path).await?).await?;
    }

    campaign.set_subject(args.subject);
    campaign.set_message(message);

    let outcome = campaign.send().await;
    print!("{}", describe(&campaign));

    match outcome? {
        SendOutcome::Sent(_) => eprintln!("\n✨ Done!"),
        SendOutcome::Declined => eprintln!("\n🚫 Cancelled, nothing was sent."),
    }
    Ok(())
}

async fn cmd_clear(config: ClientConfig, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cleared = if yes {
        new_campaign(&config, AutoConfirm).clear_recipients().await?
    } else {
        new_campaign(&config, TerminalFeedback).clear_recipients().await?
    };

    if cleared {
        eprintln!("🗑️  Recipients and attachment cleared");
    }
    Ok(())
}

async fn cmd_shell(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📬 Bulkmail shell on {} (type `help`)", config.backend_url);

    let mut campaign = new_campaign(&config, TerminalFeedback);
    campaign.load().await;
    print!("{}", describe(&campaign));

    loop {
        print!("bulkmail> ");
        io::stdout().flush()?;

        // Locked per line: confirmations read stdin too.
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };

        match command {
            ShellCommand::Add(email) => {
                // invalid or duplicate addresses were already alerted
                let _ = campaign.add_recipient(&email).await;
            }
            ShellCommand::Remove(email) => {
                if campaign.remove_recipient(&email).await == Removal::NotPresent {
                    eprintln!("{} is not in the list", email);
                }
            }
            ShellCommand::Select(path) => match FilePayload::from_path(&path).await {
                Ok(file) => campaign.select_file(file),
                Err(e) => eprintln!("Cannot read {}: {}", path.display(), e),
            },
            ShellCommand::Unselect => campaign.remove_file(),
            ShellCommand::Upload => {
                let _ = campaign.upload_file().await;
            }
            ShellCommand::Attach(path) => match FilePayload::from_path(&path).await {
                Ok(file) => {
                    let _ = campaign.upload_attachment(file).await;
                }
                Err(e) => eprintln!("Cannot read {}: {}", path.display(), e),
            },
            ShellCommand::Detach => {
                campaign.remove_attachment().await;
            }
            ShellCommand::Subject(subject) => campaign.set_subject(subject),
            ShellCommand::Message(message) => campaign.set_message(message),
            ShellCommand::Send => {
                let _ = campaign.send().await;
            }
            ShellCommand::ClearForm => {
                campaign.clear_form().await;
            }
            ShellCommand::ClearAll => {
                let _ = campaign.clear_recipients().await;
            }
            ShellCommand::Count => {
                campaign.refresh_count().await;
            }
            ShellCommand::Status => {}
            ShellCommand::CloseModal => campaign.presenter_mut().close_success_modal(),
            ShellCommand::Help => {
                println!("{}", SHELL_HELP);
                continue;
            }
            ShellCommand::Quit => break,
        }

        print!("{}", describe(&campaign));
    }

    Ok(())
}
