//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are RFC 3339 UTC strings with a fixed millisecond precision so
//! that lexical order equals chronological order. Attachments are stored as
//! compact JSON arrays.

use chrono::{DateTime, SecondsFormat, Utc};
use dunbar_core::message::{Attachment, Conversation, Message};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Attachments ─────────────────────────────────────────────────────────────

pub fn encode_attachments(attachments: &[Attachment]) -> Result<String> {
  Ok(serde_json::to_string(attachments)?)
}

pub fn decode_attachments(s: &str) -> Result<Vec<Attachment>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawConversation::from_row`].
pub const CONVERSATION_COLUMNS: &str = "c.id, c.account_id, c.platform, c.title, c.kind, \
   c.participant_count, c.unread_count, c.last_activity, c.archived, c.muted, c.pinned";

/// Raw values read from a `conversations` row plus its participants.
pub struct RawConversation {
  pub id:                String,
  pub account_id:        String,
  pub platform:          String,
  pub title:             String,
  pub kind:              String,
  pub participant_count: u32,
  pub unread_count:      u32,
  pub last_activity:     String,
  pub archived:          bool,
  pub muted:             bool,
  pub pinned:            bool,
  pub participants:      Vec<String>,
}

impl RawConversation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      account_id:        row.get(1)?,
      platform:          row.get(2)?,
      title:             row.get(3)?,
      kind:              row.get(4)?,
      participant_count: row.get(5)?,
      unread_count:      row.get(6)?,
      last_activity:     row.get(7)?,
      archived:          row.get(8)?,
      muted:             row.get(9)?,
      pinned:            row.get(10)?,
      participants:      Vec::new(),
    })
  }

  pub fn into_conversation(self) -> Result<Conversation> {
    Ok(Conversation {
      id:                self.id,
      account_id:        self.account_id,
      platform:          self.platform,
      title:             self.title,
      kind:              self.kind.parse()?,
      participants:      self.participants,
      participant_count: self.participant_count,
      unread_count:      self.unread_count,
      last_activity:     decode_dt(&self.last_activity)?,
      archived:          self.archived,
      muted:             self.muted,
      pinned:            self.pinned,
    })
  }
}

/// Column list matching [`RawMessage::from_row`].
pub const MESSAGE_COLUMNS: &str = "conversation_uid, id, contact_uid, timestamp, \
   sender_uid, sender_name, content, platform, platform_id, is_sent, attachments, sort_key";

/// Raw values read from a `messages` row.
pub struct RawMessage {
  pub conversation_uid: String,
  pub id:               String,
  pub contact_uid:      String,
  pub timestamp:        String,
  pub sender_uid:       String,
  pub sender_name:      String,
  pub content:          String,
  pub platform:         String,
  pub platform_id:      String,
  pub is_sent:          bool,
  pub attachments:      String,
  pub sort_key:         String,
}

impl RawMessage {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      conversation_uid: row.get(0)?,
      id:               row.get(1)?,
      contact_uid:      row.get(2)?,
      timestamp:        row.get(3)?,
      sender_uid:       row.get(4)?,
      sender_name:      row.get(5)?,
      content:          row.get(6)?,
      platform:         row.get(7)?,
      platform_id:      row.get(8)?,
      is_sent:          row.get(9)?,
      attachments:      row.get(10)?,
      sort_key:         row.get(11)?,
    })
  }

  pub fn into_message(self) -> Result<Message> {
    Ok(Message {
      id:               self.id,
      conversation_uid: self.conversation_uid,
      contact_uid:      self.contact_uid,
      timestamp:        decode_dt(&self.timestamp)?,
      sender_uid:       self.sender_uid,
      sender_name:      self.sender_name,
      content:          self.content,
      platform:         self.platform,
      platform_id:      self.platform_id,
      is_sent:          self.is_sent,
      attachments:      decode_attachments(&self.attachments)?,
      sort_key:         self.sort_key,
    })
  }
}

/// Owned, pre-encoded message values ready to bind to an INSERT.
pub struct EncodedMessage {
  pub conversation_uid: String,
  pub id:               String,
  pub contact_uid:      String,
  pub timestamp:        String,
  pub sender_uid:       String,
  pub sender_name:      String,
  pub content:          String,
  pub platform:         String,
  pub platform_id:      String,
  pub is_sent:          bool,
  pub attachments:      String,
  pub sort_key:         String,
}

impl EncodedMessage {
  pub fn encode(m: Message) -> Result<Self> {
    Ok(Self {
      attachments:      encode_attachments(&m.attachments)?,
      timestamp:        encode_dt(m.timestamp),
      conversation_uid: m.conversation_uid,
      id:               m.id,
      contact_uid:      m.contact_uid,
      sender_uid:       m.sender_uid,
      sender_name:      m.sender_name,
      content:          m.content,
      platform:         m.platform,
      platform_id:      m.platform_id,
      is_sent:          m.is_sent,
      sort_key:         m.sort_key,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let early = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let late = early + chrono::Duration::milliseconds(1500);
    let (a, b) = (encode_dt(early), encode_dt(late));
    assert_eq!(a, "2024-01-02T03:04:05.000Z");
    assert!(a < b);
    assert_eq!(decode_dt(&b).unwrap(), late);
  }

  #[test]
  fn bad_timestamp_is_date_parse_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
