//! Conversation and message types.
//!
//! These are the normalised shapes every message provider maps into. Messages
//! are immutable once synced; a re-sync overwrites them by key.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ─── Conversation ────────────────────────────────────────────────────────────

/// Whether a conversation is one-to-one or has several participants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
  #[default]
  Single,
  Group,
}

impl ConversationKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ConversationKind::Single => "single",
      ConversationKind::Group => "group",
    }
  }
}

impl fmt::Display for ConversationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ConversationKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "single" => Ok(ConversationKind::Single),
      "group" => Ok(ConversationKind::Group),
      other => Err(Error::UnknownConversationKind(other.to_string())),
    }
  }
}

/// A chat thread within one provider account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
  pub id:                String,
  pub account_id:        String,
  pub platform:          String,
  pub title:             String,
  #[serde(rename = "type")]
  pub kind:              ConversationKind,
  /// Participant identifiers in provider order.
  pub participants:      Vec<String>,
  /// Total participant count reported by the provider; may exceed
  /// `participants.len()` when the provider truncates the list.
  pub participant_count: u32,
  pub unread_count:      u32,
  pub last_activity:     DateTime<Utc>,
  pub archived:          bool,
  pub muted:             bool,
  pub pinned:            bool,
}

// ─── Attachment ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
  Img,
  Video,
  Audio,
  #[default]
  #[serde(other)]
  Unknown,
}

/// Media or file carried by a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
  #[serde(rename = "type", default)]
  pub kind:          AttachmentKind,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub src_url:       String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub file_name:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub file_size:     Option<u64>,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub mime_type:     String,
  /// Playback length in seconds.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub duration:      Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub width:         Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub height:        Option<u32>,
  #[serde(default)]
  pub is_gif:        bool,
  #[serde(default)]
  pub is_sticker:    bool,
  #[serde(default)]
  pub is_voice_note: bool,
}

// ─── Message ─────────────────────────────────────────────────────────────────

/// A single message within a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
  pub id:               String,
  pub conversation_uid: String,
  /// Contact the message is attributed to. Providers that cannot resolve a
  /// contact use the sender identifier.
  pub contact_uid:      String,
  pub timestamp:        DateTime<Utc>,
  pub sender_uid:       String,
  pub sender_name:      String,
  pub content:          String,
  pub platform:         String,
  pub platform_id:      String,
  pub is_sent:          bool,
  pub attachments:      Vec<Attachment>,
  /// Opaque tie-breaker for equal timestamps.
  pub sort_key:         String,
}

impl Message {
  /// Chronological order within a conversation.
  pub fn chronological(a: &Message, b: &Message) -> std::cmp::Ordering {
    a.timestamp
      .cmp(&b.timestamp)
      .then_with(|| a.sort_key.cmp(&b.sort_key))
  }
}

/// Everything a full-refresh message provider returns from one sync.
#[derive(Debug, Clone, Default)]
pub struct MessageSnapshot {
  pub conversations: Vec<Conversation>,
  pub messages:      Vec<Message>,
}
