//! Command handlers. Each wires the configured provider into its manager
//! and reports in plain text on stdout.

use anyhow::{Context, Result};
use dunbar_core::paths::DunbarPaths;
use dunbar_providers::{BeeperMessages, GoogleContacts};
use dunbar_store::{ContactFiles, MessageDb};
use dunbar_sync::{ContactManager, MessageManager};
use tracing::info;

use crate::{
  app::{ContactsApp, MessagesApp},
  output,
  settings::{ContactsProvider, MessagesProvider, ProviderSettings},
  tui,
};

// ─── Managers ────────────────────────────────────────────────────────────────

fn contact_manager(paths: &DunbarPaths) -> Result<ContactManager<GoogleContacts>> {
  let settings = ProviderSettings::load(paths)?;
  let source = match settings.contacts_provider()? {
    ContactsProvider::Google => GoogleContacts::open(paths).context(
      "failed to initialize provider. Run 'dunbar contacts init' first",
    )?,
  };
  Ok(ContactManager::new(ContactFiles::new(paths), source))
}

async fn message_manager(paths: &DunbarPaths) -> Result<MessageManager<BeeperMessages>> {
  let settings = ProviderSettings::load(paths)?;
  let source = match settings.messages_provider()? {
    MessagesProvider::Beeper => BeeperMessages::open(paths).context(
      "failed to initialize provider. Run 'dunbar messages init' first",
    )?,
  };
  paths.ensure_dirs().context("failed to create data directory")?;
  let db = MessageDb::open(paths.messages_db())
    .await
    .context("failed to open message database")?;
  Ok(MessageManager::new(db, source))
}

// ─── Contacts ────────────────────────────────────────────────────────────────

pub async fn contacts_list(paths: &DunbarPaths) -> Result<()> {
  let manager = contact_manager(paths)?;
  let contacts = manager.list().await.context("failed to list contacts")?;
  for contact in &contacts {
    println!("{}", output::contact_line(contact));
  }
  Ok(())
}

pub async fn contacts_sync(paths: &DunbarPaths) -> Result<()> {
  let manager = contact_manager(paths)?;
  println!("Syncing contacts...");
  let report = manager.sync().await.context("sync failed")?;
  info!(
    updated = report.updated,
    deleted = report.deleted,
    incremental = report.incremental,
    "contact sync finished"
  );
  let total = manager.list().await.context("failed to count contacts")?.len();
  println!("Sync complete! Total contacts: {total}");
  Ok(())
}

pub async fn contacts_tui(paths: &DunbarPaths) -> Result<()> {
  let mut app = ContactsApp::new(contact_manager(paths)?);
  app.load().await.context("failed to load contacts")?;
  tui::run_screen(&mut app).await
}

// ─── Messages ────────────────────────────────────────────────────────────────

pub async fn messages_list(paths: &DunbarPaths) -> Result<()> {
  let manager = message_manager(paths).await?;
  let conversations = manager
    .conversations()
    .await
    .context("failed to list conversations")?;
  for conversation in &conversations {
    println!("{}", output::conversation_line(conversation));
  }
  Ok(())
}

pub async fn messages_sync(paths: &DunbarPaths) -> Result<()> {
  let manager = message_manager(paths).await?;
  let report = manager.sync().await.context("sync failed")?;
  println!(
    "Synced {} conversations with {} total messages",
    report.conversations, report.messages
  );
  Ok(())
}

pub async fn messages_tui(paths: &DunbarPaths) -> Result<()> {
  let mut app = MessagesApp::new(message_manager(paths).await?);
  app.load().await.context("failed to load conversations")?;
  tui::run_screen(&mut app).await
}

pub fn version() {
  println!("dunbar version {}", env!("CARGO_PKG_VERSION"));
}
