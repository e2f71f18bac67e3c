//! Tests for `ContactFiles` against a temp directory and `MessageDb` against an
//! in-memory database.

use std::os::unix::fs::PermissionsExt as _;

use chrono::{DateTime, TimeZone as _, Utc};
use dunbar_core::{
  contact::{Contact, PhoneNumber},
  message::{Attachment, AttachmentKind, Conversation, ConversationKind, Message},
};

use crate::{ContactFiles, Error, MessageDb};

// ─── Contacts ────────────────────────────────────────────────────────────────

fn contact(uid: &str, name: &str) -> Contact {
  Contact {
    uid: uid.into(),
    full_name: name.into(),
    phone_numbers: vec![PhoneNumber { value: "555-0100".into(), kind: "mobile".into() }],
    ..Contact::default()
  }
}

#[tokio::test]
async fn put_and_get_contact() {
  let dir = tempfile::tempdir().unwrap();
  let files = ContactFiles::in_dir(dir.path().join("people"));

  files.put(&contact("123", "Ada Lovelace")).await.unwrap();

  let fetched = files.get("123").await.unwrap().unwrap();
  assert_eq!(fetched.full_name, "Ada Lovelace");
  assert_eq!(fetched.primary_phone(), "555-0100");
}

#[tokio::test]
async fn contact_file_is_pretty_json_with_public_mode() {
  let dir = tempfile::tempdir().unwrap();
  let files = ContactFiles::in_dir(dir.path());

  files.put(&contact("123", "Ada Lovelace")).await.unwrap();

  let path = dir.path().join("123.json");
  let text = std::fs::read_to_string(&path).unwrap();
  assert!(text.starts_with("{\n  \"uid\": \"123\""));
  let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
  assert_eq!(mode, 0o644);
}

#[tokio::test]
async fn get_missing_contact_returns_none() {
  let dir = tempfile::tempdir().unwrap();
  let files = ContactFiles::in_dir(dir.path());
  assert!(files.get("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn list_skips_non_json_and_tolerates_missing_dir() {
  let dir = tempfile::tempdir().unwrap();
  let files = ContactFiles::in_dir(dir.path().join("people"));
  assert!(files.list().await.unwrap().is_empty());

  files.put(&contact("1", "A")).await.unwrap();
  files.put(&contact("2", "B")).await.unwrap();
  std::fs::write(dir.path().join("people").join("notes.txt"), "x").unwrap();

  let mut uids: Vec<_> = files.list().await.unwrap().into_iter().map(|c| c.uid).collect();
  uids.sort();
  assert_eq!(uids, ["1", "2"]);
}

#[tokio::test]
async fn remove_missing_contact_is_not_found() {
  let dir = tempfile::tempdir().unwrap();
  let files = ContactFiles::in_dir(dir.path());

  files.put(&contact("1", "A")).await.unwrap();
  files.remove("1").await.unwrap();
  assert!(files.get("1").await.unwrap().is_none());

  let err = files.remove("1").await.unwrap_err();
  assert!(matches!(err, Error::ContactNotFound(uid) if uid == "1"));
}

#[tokio::test]
async fn path_like_uids_are_rejected() {
  let dir = tempfile::tempdir().unwrap();
  let files = ContactFiles::in_dir(dir.path());
  assert!(matches!(files.get("../etc").await, Err(Error::InvalidUid(_))));
  assert!(matches!(files.put(&contact("", "A")).await, Err(Error::InvalidUid(_))));
}

// ─── Messages ────────────────────────────────────────────────────────────────

async fn db() -> MessageDb {
  MessageDb::open_in_memory()
    .await
    .expect("in-memory db")
}

fn at(h: u32, m: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 3, 10, h, m, 0).unwrap()
}

fn conversation(id: &str, last_activity: DateTime<Utc>, participants: &[&str]) -> Conversation {
  Conversation {
    id:                id.into(),
    account_id:        "acct".into(),
    platform:          "whatsapp".into(),
    title:             format!("Chat {id}"),
    kind:              if participants.len() > 1 {
      ConversationKind::Group
    } else {
      ConversationKind::Single
    },
    participants:      participants.iter().map(|p| p.to_string()).collect(),
    participant_count: participants.len() as u32,
    unread_count:      0,
    last_activity,
    archived:          false,
    muted:             false,
    pinned:            false,
  }
}

fn message(conv: &str, id: &str, sender: &str, ts: DateTime<Utc>, sort_key: &str) -> Message {
  Message {
    id:               id.into(),
    conversation_uid: conv.into(),
    contact_uid:      sender.into(),
    timestamp:        ts,
    sender_uid:       sender.into(),
    sender_name:      sender.to_uppercase(),
    content:          format!("message {id}"),
    platform:         "whatsapp".into(),
    platform_id:      id.into(),
    is_sent:          false,
    attachments:      vec![],
    sort_key:         sort_key.into(),
  }
}

#[tokio::test]
async fn conversations_round_trip_with_participant_order() {
  let db = db().await;
  db.save_conversations(vec![conversation("c1", at(9, 0), &["zed", "amy", "bob"])])
    .await
    .unwrap();

  let c = db.conversation("c1").await.unwrap().unwrap();
  assert_eq!(c.participants, ["zed", "amy", "bob"]);
  assert_eq!(c.kind, ConversationKind::Group);
  assert_eq!(c.last_activity, at(9, 0));
  assert!(db.conversation("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn resaving_conversation_overwrites_by_id() {
  let db = db().await;
  db.save_conversations(vec![conversation("c1", at(9, 0), &["a", "b"])])
    .await
    .unwrap();

  let mut updated = conversation("c1", at(10, 0), &["a"]);
  updated.title = "Renamed".into();
  updated.unread_count = 4;
  db.save_conversations(vec![updated]).await.unwrap();

  let all = db.all_conversations().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].title, "Renamed");
  assert_eq!(all[0].unread_count, 4);
  assert_eq!(all[0].participants, ["a"]);
}

#[tokio::test]
async fn all_conversations_newest_first() {
  let db = db().await;
  db.save_conversations(vec![
    conversation("old", at(8, 0), &["a"]),
    conversation("new", at(12, 0), &["b"]),
    conversation("mid", at(10, 0), &["c"]),
  ])
  .await
  .unwrap();

  let ids: Vec<_> = db
    .all_conversations()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.id)
    .collect();
  assert_eq!(ids, ["new", "mid", "old"]);
}

#[tokio::test]
async fn messages_ordered_by_timestamp_then_sort_key() {
  let db = db().await;
  db.save_messages(vec![
    message("c1", "m3", "a", at(9, 5), "1"),
    message("c1", "m2", "a", at(9, 0), "2"),
    message("c1", "m1", "a", at(9, 0), "1"),
    message("c2", "x", "a", at(8, 0), "1"),
  ])
  .await
  .unwrap();

  let ids: Vec<_> = db
    .messages_for_conversation("c1")
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.id)
    .collect();
  assert_eq!(ids, ["m1", "m2", "m3"]);
}

#[tokio::test]
async fn resync_overwrites_messages_by_key() {
  let db = db().await;
  let original = message("c1", "m1", "a", at(9, 0), "1");
  db.save_messages(vec![original.clone()]).await.unwrap();

  let mut edited = original.clone();
  edited.content = "edited".into();
  db.save_messages(vec![edited]).await.unwrap();

  let msgs = db.messages_for_conversation("c1").await.unwrap();
  assert_eq!(msgs.len(), 1);
  assert_eq!(msgs[0].content, "edited");
  assert_eq!(db.message_count().await.unwrap(), 1);
}

#[tokio::test]
async fn same_message_id_in_different_conversations_is_distinct() {
  let db = db().await;
  db.save_messages(vec![
    message("c1", "1", "a", at(9, 0), ""),
    message("c2", "1", "a", at(9, 0), ""),
  ])
  .await
  .unwrap();
  assert_eq!(db.message_count().await.unwrap(), 2);
}

#[tokio::test]
async fn attachments_survive_storage() {
  let db = db().await;
  let mut m = message("c1", "m1", "a", at(9, 0), "1");
  m.attachments = vec![Attachment {
    kind: AttachmentKind::Video,
    file_name: "clip.mp4".into(),
    duration: Some(12.5),
    width: Some(640),
    height: Some(480),
    ..Attachment::default()
  }];
  db.save_messages(vec![m.clone()]).await.unwrap();

  let stored = db.messages_for_conversation("c1").await.unwrap();
  assert_eq!(stored[0].attachments, m.attachments);
}

#[tokio::test]
async fn contact_queries() {
  let db = db().await;
  db.save_conversations(vec![
    conversation("c1", at(9, 0), &["alice"]),
    conversation("c2", at(11, 0), &["alice", "bob"]),
    conversation("c3", at(12, 0), &["bob"]),
  ])
  .await
  .unwrap();
  db.save_messages(vec![
    message("c1", "1", "alice", at(9, 0), ""),
    message("c2", "2", "alice", at(10, 30), ""),
    message("c2", "3", "bob", at(11, 0), ""),
  ])
  .await
  .unwrap();

  let from_alice = db.messages_for_contact("alice").await.unwrap();
  assert_eq!(from_alice.len(), 2);
  assert_eq!(db.last_contact_date("alice").await.unwrap(), Some(at(10, 30)));
  assert_eq!(db.last_contact_date("carol").await.unwrap(), None);

  let convs: Vec<_> = db
    .conversations_for_contact("alice")
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.id)
    .collect();
  assert_eq!(convs, ["c2", "c1"]);
}

#[tokio::test]
async fn delete_conversation_removes_messages_and_participants() {
  let db = db().await;
  db.save_conversations(vec![conversation("c1", at(9, 0), &["alice"])])
    .await
    .unwrap();
  db.save_messages(vec![message("c1", "1", "alice", at(9, 0), "")])
    .await
    .unwrap();

  assert!(db.delete_conversation("c1").await.unwrap());
  assert!(db.conversation("c1").await.unwrap().is_none());
  assert!(db.messages_for_conversation("c1").await.unwrap().is_empty());
  assert!(db.conversations_for_contact("alice").await.unwrap().is_empty());
  assert!(!db.delete_conversation("c1").await.unwrap());
}

#[tokio::test]
async fn reopening_file_keeps_data() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("messages.db");
  {
    let db = MessageDb::open(&path).await.unwrap();
    db.save_conversations(vec![conversation("c1", at(9, 0), &["a"])])
      .await
      .unwrap();
  }
  let db = MessageDb::open(&path).await.unwrap();
  assert_eq!(db.all_conversations().await.unwrap().len(), 1);
}
