//! [`MessageManager`], full-refresh ingestion and read-only projections.

use chrono::{DateTime, Utc};
use dunbar_core::{
  message::{Conversation, Message},
  source::MessageSource,
};
use dunbar_store::MessageDb;
use tracing::info;

use crate::{Error, Result};

/// Outcome of a [`MessageManager::sync`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageSyncReport {
  pub conversations: usize,
  pub messages:      usize,
}

pub struct MessageManager<S> {
  db:     MessageDb,
  source: S,
}

impl<S: MessageSource> MessageManager<S> {
  pub fn new(db: MessageDb, source: S) -> Self { Self { db, source } }

  /// Fetch the provider's full snapshot and overwrite stored rows by key.
  ///
  /// A failed sync may leave earlier batches written; rerunning is safe.
  /// Records removed upstream are not removed locally.
  pub async fn sync(&self) -> Result<MessageSyncReport> {
    let snapshot = self
      .source
      .sync()
      .await
      .map_err(|e| Error::ProviderFetch(Box::new(e)))?;

    let report = MessageSyncReport {
      conversations: snapshot.conversations.len(),
      messages:      snapshot.messages.len(),
    };
    self.db.save_conversations(snapshot.conversations).await?;
    self.db.save_messages(snapshot.messages).await?;

    info!(
      provider = self.source.name(),
      conversations = report.conversations,
      messages = report.messages,
      "message sync complete"
    );
    Ok(report)
  }

  pub async fn messages_for_contact(&self, contact_uid: &str) -> Result<Vec<Message>> {
    Ok(self.db.messages_for_contact(contact_uid).await?)
  }

  /// Oldest first, ties broken by sort key.
  pub async fn messages_for_conversation(&self, conversation_uid: &str) -> Result<Vec<Message>> {
    Ok(self.db.messages_for_conversation(conversation_uid).await?)
  }

  pub async fn last_contact_date(&self, contact_uid: &str) -> Result<Option<DateTime<Utc>>> {
    Ok(self.db.last_contact_date(contact_uid).await?)
  }

  pub async fn conversation(&self, id: &str) -> Result<Option<Conversation>> {
    Ok(self.db.conversation(id).await?)
  }

  /// Every conversation, most recently active first.
  pub async fn conversations(&self) -> Result<Vec<Conversation>> {
    Ok(self.db.all_conversations().await?)
  }

  pub async fn conversations_for_contact(&self, contact_uid: &str) -> Result<Vec<Conversation>> {
    Ok(self.db.conversations_for_contact(contact_uid).await?)
  }

  /// Remove a conversation and its messages from the local store only.
  pub async fn delete_conversation(&self, id: &str) -> Result<()> {
    if self.db.delete_conversation(id).await? {
      Ok(())
    } else {
      Err(Error::NotFound(id.to_string()))
    }
  }
}
