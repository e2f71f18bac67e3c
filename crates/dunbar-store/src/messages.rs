//! [`MessageDb`], the SQLite store for conversations and messages.

use std::path::Path;

use chrono::{DateTime, Utc};
use dunbar_core::message::{Conversation, Message};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Result,
  encode::{
    CONVERSATION_COLUMNS, EncodedMessage, MESSAGE_COLUMNS, RawConversation,
    RawMessage, decode_dt, encode_dt,
  },
  schema::SCHEMA,
};

const PARTICIPANTS_QUERY: &str = "SELECT participant_id FROM conversation_participants
   WHERE conversation_id = ?1 ORDER BY position";

// ─── Store ───────────────────────────────────────────────────────────────────

/// Conversations and messages backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct MessageDb {
  conn: tokio_rusqlite::Connection,
}

impl MessageDb {
  /// Open (or create) a database at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let db = Self { conn };
    db.init_schema().await?;
    Ok(db)
  }

  /// Open an in-memory database, used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let db = Self { conn };
    db.init_schema().await?;
    Ok(db)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Upsert conversations by id, replacing their participant lists.
  pub async fn save_conversations(&self, conversations: Vec<Conversation>) -> Result<()> {
    let count = conversations.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut upsert = tx.prepare(
            "INSERT INTO conversations (
               id, account_id, platform, title, kind, participant_count,
               unread_count, last_activity, archived, muted, pinned
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(id) DO UPDATE SET
               account_id        = excluded.account_id,
               platform          = excluded.platform,
               title             = excluded.title,
               kind              = excluded.kind,
               participant_count = excluded.participant_count,
               unread_count      = excluded.unread_count,
               last_activity     = excluded.last_activity,
               archived          = excluded.archived,
               muted             = excluded.muted,
               pinned            = excluded.pinned",
          )?;
          let mut clear = tx
            .prepare("DELETE FROM conversation_participants WHERE conversation_id = ?1")?;
          let mut member = tx.prepare(
            "INSERT INTO conversation_participants (conversation_id, position, participant_id)
             VALUES (?1, ?2, ?3)",
          )?;

          for c in &conversations {
            upsert.execute(rusqlite::params![
              c.id,
              c.account_id,
              c.platform,
              c.title,
              c.kind.as_str(),
              c.participant_count,
              c.unread_count,
              encode_dt(c.last_activity),
              c.archived,
              c.muted,
              c.pinned,
            ])?;
            clear.execute(rusqlite::params![c.id])?;
            for (position, participant) in c.participants.iter().enumerate() {
              member.execute(rusqlite::params![c.id, position as i64, participant])?;
            }
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    debug!(count, "saved conversations");
    Ok(())
  }

  /// Insert messages, overwriting any existing row with the same
  /// `(conversation_uid, id)`.
  pub async fn save_messages(&self, messages: Vec<Message>) -> Result<()> {
    let count = messages.len();
    let encoded = messages
      .into_iter()
      .map(EncodedMessage::encode)
      .collect::<Result<Vec<_>>>()?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut insert = tx.prepare(
            "INSERT OR REPLACE INTO messages (
               conversation_uid, id, contact_uid, timestamp, sender_uid, sender_name,
               content, platform, platform_id, is_sent, attachments, sort_key
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          )?;
          for m in &encoded {
            insert.execute(rusqlite::params![
              m.conversation_uid,
              m.id,
              m.contact_uid,
              m.timestamp,
              m.sender_uid,
              m.sender_name,
              m.content,
              m.platform,
              m.platform_id,
              m.is_sent,
              m.attachments,
              m.sort_key,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    debug!(count, "saved messages");
    Ok(())
  }

  /// Remove a conversation, its participants, and its messages.
  ///
  /// Returns `false` if no such conversation was stored.
  pub async fn delete_conversation(&self, id: &str) -> Result<bool> {
    let id = id.to_string();

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM messages WHERE conversation_uid = ?1",
          rusqlite::params![id],
        )?;
        let removed =
          tx.execute("DELETE FROM conversations WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(removed > 0)
      })
      .await?;

    Ok(removed)
  }

  // ── Message reads ─────────────────────────────────────────────────────────

  async fn query_messages(&self, sql: String, key: String) -> Result<Vec<Message>> {
    let raws: Vec<RawMessage> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![key], RawMessage::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMessage::into_message).collect()
  }

  /// Messages in a conversation, oldest first, ties broken by sort key.
  pub async fn messages_for_conversation(&self, conversation_uid: &str) -> Result<Vec<Message>> {
    let sql = format!(
      "SELECT {MESSAGE_COLUMNS} FROM messages
       WHERE conversation_uid = ?1
       ORDER BY timestamp ASC, sort_key ASC"
    );
    self.query_messages(sql, conversation_uid.to_string()).await
  }

  /// Messages attributed to a contact across all conversations, oldest first.
  pub async fn messages_for_contact(&self, contact_uid: &str) -> Result<Vec<Message>> {
    let sql = format!(
      "SELECT {MESSAGE_COLUMNS} FROM messages
       WHERE contact_uid = ?1
       ORDER BY timestamp ASC, sort_key ASC"
    );
    self.query_messages(sql, contact_uid.to_string()).await
  }

  /// Timestamp of the most recent message attributed to a contact.
  pub async fn last_contact_date(&self, contact_uid: &str) -> Result<Option<DateTime<Utc>>> {
    let contact_uid = contact_uid.to_string();

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        let latest = conn.query_row(
          "SELECT MAX(timestamp) FROM messages WHERE contact_uid = ?1",
          rusqlite::params![contact_uid],
          |row| row.get(0),
        )?;
        Ok(latest)
      })
      .await?;

    raw.as_deref().map(decode_dt).transpose()
  }

  pub async fn message_count(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))?))
      .await?;
    Ok(count.max(0) as u64)
  }

  // ── Conversation reads ────────────────────────────────────────────────────

  async fn query_conversations(
    &self,
    sql: String,
    key: Option<String>,
  ) -> Result<Vec<Conversation>> {
    let raws: Vec<RawConversation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = match &key {
          Some(k) => stmt
            .query_map(rusqlite::params![k], RawConversation::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawConversation::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };

        let mut members = conn.prepare(PARTICIPANTS_QUERY)?;
        for raw in &mut rows {
          raw.participants = members
            .query_map(rusqlite::params![raw.id], |r| r.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        }
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConversation::into_conversation).collect()
  }

  /// Look up one conversation. Returns `None` if not found.
  pub async fn conversation(&self, id: &str) -> Result<Option<Conversation>> {
    let id = id.to_string();

    let raw: Option<RawConversation> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {CONVERSATION_COLUMNS} FROM conversations c WHERE c.id = ?1");
        let raw = conn
          .query_row(&sql, rusqlite::params![id], RawConversation::from_row)
          .optional()?;
        let Some(mut raw) = raw else {
          return Ok(None);
        };

        let mut members = conn.prepare(PARTICIPANTS_QUERY)?;
        raw.participants = members
          .query_map(rusqlite::params![raw.id], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawConversation::into_conversation).transpose()
  }

  /// Every conversation, most recently active first.
  pub async fn all_conversations(&self) -> Result<Vec<Conversation>> {
    let sql = format!(
      "SELECT {CONVERSATION_COLUMNS} FROM conversations c
       ORDER BY c.last_activity DESC, c.id ASC"
    );
    self.query_conversations(sql, None).await
  }

  /// Conversations the given participant belongs to, most recent first.
  pub async fn conversations_for_contact(&self, participant_id: &str) -> Result<Vec<Conversation>> {
    let sql = format!(
      "SELECT DISTINCT {CONVERSATION_COLUMNS} FROM conversations c
       JOIN conversation_participants p ON p.conversation_id = c.id
       WHERE p.participant_id = ?1
       ORDER BY c.last_activity DESC, c.id ASC"
    );
    self
      .query_conversations(sql, Some(participant_id.to_string()))
      .await
  }
}
