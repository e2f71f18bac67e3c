//! Normalisation of Beeper chats and messages.

use chrono::{DateTime, Utc};
use dunbar_core::message::{
  Attachment, AttachmentKind, Conversation, ConversationKind, Message,
};

use super::schema::{BeeperAttachment, BeeperMessage, Chat};

pub fn chat_to_conversation(chat: Chat) -> Conversation {
  let kind = match chat.kind.as_str() {
    "group" => ConversationKind::Group,
    _ => ConversationKind::Single,
  };
  let participants: Vec<String> = chat.participants.items.into_iter().map(|u| u.id).collect();
  let participant_count = chat.participants.total.max(participants.len() as u32);

  Conversation {
    id: chat.id,
    account_id: chat.account_id,
    platform: chat.network,
    title: chat.title,
    kind,
    participants,
    participant_count,
    unread_count: chat.unread_count,
    last_activity: chat.last_activity.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    archived: chat.is_archived,
    muted: chat.is_muted,
    pinned: chat.is_pinned,
  }
}

fn attachment_kind(kind: &str) -> AttachmentKind {
  match kind {
    "img" => AttachmentKind::Img,
    "video" => AttachmentKind::Video,
    "audio" => AttachmentKind::Audio,
    _ => AttachmentKind::Unknown,
  }
}

fn convert_attachment(a: BeeperAttachment) -> Attachment {
  let (width, height) = match a.size {
    Some(size) => (Some(size.width), Some(size.height)),
    None => (None, None),
  };
  Attachment {
    kind: attachment_kind(&a.kind),
    src_url: a.src_url,
    file_name: a.file_name,
    file_size: a.file_size,
    mime_type: a.mime_type,
    duration: a.duration,
    width,
    height,
    is_gif: a.is_gif,
    is_sticker: a.is_sticker,
    is_voice_note: a.is_voice_note,
  }
}

/// Messages are attributed to their sender and take their platform from the
/// owning chat's network.
pub fn convert_message(msg: BeeperMessage, conversation: &Conversation) -> Message {
  let conversation_uid = if msg.chat_id.is_empty() {
    conversation.id.clone()
  } else {
    msg.chat_id
  };

  Message {
    contact_uid: msg.sender_id.clone(),
    sender_uid: msg.sender_id,
    platform_id: msg.id.clone(),
    id: msg.id,
    conversation_uid,
    timestamp: msg.timestamp,
    sender_name: msg.sender_name,
    content: msg.text.unwrap_or_default(),
    platform: conversation.platform.clone(),
    is_sent: msg.is_sender,
    attachments: msg.attachments.into_iter().map(convert_attachment).collect(),
    sort_key: msg.sort_key,
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;
  use crate::beeper::schema::Page;

  const CHATS: &str = r#"{
    "items": [
      {
        "id": "!abc:beeper.local",
        "accountID": "whatsapp",
        "network": "WhatsApp",
        "title": "Family",
        "type": "group",
        "participants": {
          "items": [ { "id": "@mum" }, { "id": "@dad" } ],
          "hasMore": true,
          "total": 5
        },
        "unreadCount": 3,
        "lastActivity": "2024-03-10T09:30:00.000Z",
        "isArchived": false,
        "isMuted": true,
        "isPinned": true
      },
      { "id": "!dm:beeper.local", "type": "single" }
    ],
    "hasMore": true,
    "oldestCursor": "c-1"
  }"#;

  const MESSAGES: &str = r#"{
    "items": [
      {
        "id": "m1",
        "chatID": "!abc:beeper.local",
        "senderID": "@mum",
        "senderName": "Mum",
        "timestamp": "2024-03-10T09:30:00Z",
        "text": "Dinner at 7",
        "isSender": false,
        "sortKey": "0001",
        "attachments": [
          {
            "type": "img",
            "srcURL": "mxc://beeper/photo",
            "fileName": "photo.jpg",
            "mimeType": "image/jpeg",
            "size": { "width": 800, "height": 600 },
            "isGif": true
          },
          { "type": "document" }
        ]
      },
      { "id": "m2", "senderID": "@me", "timestamp": "2024-03-10T09:31:00Z", "isSender": true }
    ],
    "hasMore": false
  }"#;

  #[test]
  fn maps_chat() {
    let page: Page<Chat> = serde_json::from_str(CHATS).unwrap();
    assert!(page.has_more);
    assert_eq!(page.oldest_cursor.as_deref(), Some("c-1"));

    let mut chats = page.items.into_iter().map(chat_to_conversation);
    let family = chats.next().unwrap();
    assert_eq!(family.account_id, "whatsapp");
    assert_eq!(family.platform, "WhatsApp");
    assert_eq!(family.kind, ConversationKind::Group);
    assert_eq!(family.participants, ["@mum", "@dad"]);
    assert_eq!(family.participant_count, 5);
    assert_eq!(family.unread_count, 3);
    assert_eq!(family.last_activity, Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap());
    assert!(family.muted && family.pinned && !family.archived);

    let dm = chats.next().unwrap();
    assert_eq!(dm.kind, ConversationKind::Single);
    assert_eq!(dm.participant_count, 0);
    assert_eq!(dm.last_activity, DateTime::<Utc>::UNIX_EPOCH);
  }

  #[test]
  fn maps_messages() {
    let chats: Page<Chat> = serde_json::from_str(CHATS).unwrap();
    let family = chat_to_conversation(chats.items.into_iter().next().unwrap());
    let page: Page<BeeperMessage> = serde_json::from_str(MESSAGES).unwrap();
    let msgs: Vec<_> = page
      .items
      .into_iter()
      .map(|m| convert_message(m, &family))
      .collect();

    let first = &msgs[0];
    assert_eq!(first.contact_uid, "@mum");
    assert_eq!(first.sender_uid, "@mum");
    assert_eq!(first.sender_name, "Mum");
    assert_eq!(first.platform, "WhatsApp");
    assert_eq!(first.platform_id, "m1");
    assert_eq!(first.content, "Dinner at 7");
    assert_eq!(first.sort_key, "0001");
    assert_eq!(first.attachments[0].kind, AttachmentKind::Img);
    assert_eq!(first.attachments[0].width, Some(800));
    assert!(first.attachments[0].is_gif);
    assert_eq!(first.attachments[1].kind, AttachmentKind::Unknown);

    let second = &msgs[1];
    assert_eq!(second.conversation_uid, "!abc:beeper.local");
    assert!(second.is_sent);
    assert_eq!(second.content, "");
  }
}
