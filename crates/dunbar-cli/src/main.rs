//! `dunbar`: keep in touch with the people who matter.
//!
//! # Usage
//!
//! ```text
//! dunbar contacts init      # choose and authorize a contacts provider
//! dunbar contacts sync      # pull contacts into ~/.config/dunbar
//! dunbar contacts list      # uid|full_name|primary_email|primary_phone
//! dunbar contacts           # browse contacts
//! dunbar messages init|sync|list
//! dunbar messages           # browse conversations
//! ```
//!
//! `DUNBAR_DIR` overrides the data directory.

mod app;
mod commands;
mod confirm;
mod output;
mod prompt;
mod render;
mod settings;
mod setup;
mod timeline;
mod tui;
mod ui;
mod viewport;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "dunbar", about = "Personal relationship manager")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Browse contacts, or manage them with a subcommand.
  Contacts {
    #[command(subcommand)]
    action: Option<ContactsAction>,
  },
  /// Browse conversations, or manage them with a subcommand.
  Messages {
    #[command(subcommand)]
    action: Option<MessagesAction>,
  },
  /// Print the version.
  Version,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum ContactsAction {
  /// Choose a contacts provider and authorize it.
  Init,
  /// Print every contact as `uid|full_name|primary_email|primary_phone`.
  List,
  /// Pull contacts from the provider.
  Sync,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum MessagesAction {
  /// Choose a messages provider and store its access token.
  Init,
  /// Print every conversation, pipe-delimited.
  List,
  /// Pull conversations and messages from the provider.
  Sync,
}

impl Command {
  /// Full-screen commands only log warnings so output doesn't tear the UI.
  fn default_level(&self) -> LevelFilter {
    match self {
      Command::Contacts { action: None } | Command::Messages { action: None } => {
        LevelFilter::WARN
      }
      _ => LevelFilter::INFO,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(cli.command.default_level().into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  match cli.command {
    Command::Contacts { action } => {
      let paths = settings::resolve_paths()?;
      match action {
        None => commands::contacts_tui(&paths).await,
        Some(ContactsAction::Init) => setup::contacts_init(&paths).await,
        Some(ContactsAction::List) => commands::contacts_list(&paths).await,
        Some(ContactsAction::Sync) => commands::contacts_sync(&paths).await,
      }
    }
    Command::Messages { action } => {
      let paths = settings::resolve_paths()?;
      match action {
        None => commands::messages_tui(&paths).await,
        Some(MessagesAction::Init) => setup::messages_init(&paths).await,
        Some(MessagesAction::List) => commands::messages_list(&paths).await,
        Some(MessagesAction::Sync) => commands::messages_sync(&paths).await,
      }
    }
    Command::Version => {
      commands::version();
      Ok(())
    }
  }
}
