//! Pipe-delimited lines for `list` commands, one record per line.

use chrono::SecondsFormat;
use dunbar_core::{contact::Contact, message::Conversation};

/// `uid|full_name|primary_email|primary_phone`
pub fn contact_line(contact: &Contact) -> String {
  format!(
    "{}|{}|{}|{}",
    contact.uid,
    contact.full_name,
    contact.primary_email(),
    contact.primary_phone()
  )
}

/// `id|title|platform|participant_count|unread_count|last_activity`
pub fn conversation_line(conversation: &Conversation) -> String {
  format!(
    "{}|{}|{}|{}|{}|{}",
    conversation.id,
    conversation.title,
    conversation.platform,
    conversation.participant_count,
    conversation.unread_count,
    conversation
      .last_activity
      .to_rfc3339_opts(SecondsFormat::Secs, true)
  )
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone as _, Utc};
  use dunbar_core::contact::{EmailAddress, PhoneNumber};

  use super::*;

  #[test]
  fn contact_line_uses_primary_fields() {
    let contact = Contact {
      uid: "c1".into(),
      full_name: "Ada Lovelace".into(),
      phone_numbers: vec![
        PhoneNumber { value: "1".into(), kind: "home".into() },
        PhoneNumber { value: "2".into(), kind: "mobile".into() },
      ],
      email_addresses: vec![EmailAddress { value: "ada@example.com".into(), kind: "work".into() }],
      ..Contact::default()
    };
    assert_eq!(contact_line(&contact), "c1|Ada Lovelace|ada@example.com|2");
  }

  #[test]
  fn contact_line_with_no_details() {
    let contact = Contact { uid: "c2".into(), full_name: "Nobody".into(), ..Contact::default() };
    assert_eq!(contact_line(&contact), "c2|Nobody||");
  }

  #[test]
  fn conversation_line_format() {
    let conversation = Conversation {
      id: "!abc".into(),
      title: "Family".into(),
      platform: "WhatsApp".into(),
      participant_count: 5,
      unread_count: 2,
      last_activity: Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 15).unwrap(),
      ..Conversation::default()
    };
    assert_eq!(
      conversation_line(&conversation),
      "!abc|Family|WhatsApp|5|2|2024-03-10T09:30:15Z"
    );
  }
}
