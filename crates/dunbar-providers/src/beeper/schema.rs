//! Wire types for the Beeper Desktop API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A cursor-paginated listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  #[serde(default = "Vec::new")]
  pub items:         Vec<T>,
  #[serde(default)]
  pub has_more:      bool,
  /// Cursor for the next page when paging with `direction=before`.
  #[serde(default)]
  pub oldest_cursor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
  pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participants {
  #[serde(default)]
  pub items: Vec<User>,
  #[serde(default)]
  pub total: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
  pub id:            String,
  #[serde(rename = "accountID", default)]
  pub account_id:    String,
  #[serde(default)]
  pub network:       String,
  #[serde(default)]
  pub title:         String,
  #[serde(rename = "type", default)]
  pub kind:          String,
  #[serde(default)]
  pub participants:  Participants,
  #[serde(default)]
  pub unread_count:  u32,
  #[serde(default)]
  pub last_activity: Option<DateTime<Utc>>,
  #[serde(default)]
  pub is_archived:   bool,
  #[serde(default)]
  pub is_muted:      bool,
  #[serde(default)]
  pub is_pinned:     bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Size {
  #[serde(default)]
  pub width:  u32,
  #[serde(default)]
  pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeeperAttachment {
  #[serde(rename = "type", default)]
  pub kind:          String,
  #[serde(rename = "srcURL", default)]
  pub src_url:       String,
  #[serde(default)]
  pub file_name:     String,
  #[serde(default)]
  pub file_size:     Option<u64>,
  #[serde(default)]
  pub mime_type:     String,
  #[serde(default)]
  pub duration:      Option<f64>,
  #[serde(default)]
  pub size:          Option<Size>,
  #[serde(default)]
  pub is_gif:        bool,
  #[serde(default)]
  pub is_sticker:    bool,
  #[serde(default)]
  pub is_voice_note: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeeperMessage {
  pub id:          String,
  #[serde(rename = "chatID", default)]
  pub chat_id:     String,
  #[serde(rename = "senderID", default)]
  pub sender_id:   String,
  #[serde(default)]
  pub sender_name: String,
  pub timestamp:   DateTime<Utc>,
  #[serde(default)]
  pub text:        Option<String>,
  #[serde(default)]
  pub is_sender:   bool,
  #[serde(default)]
  pub attachments: Vec<BeeperAttachment>,
  #[serde(default)]
  pub sort_key:    String,
}
