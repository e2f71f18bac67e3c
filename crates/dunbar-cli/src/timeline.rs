//! Date separators and sender grouping for a chronological message list.
//!
//! Days are calendar days in the display time zone, never UTC-rounded.

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use dunbar_core::message::Message;

/// Consecutive messages from one sender closer than this share a header.
const GROUP_WINDOW_MINUTES: i64 = 5;

/// One display record: a day separator or an index into the message slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
  Separator(NaiveDate),
  Message(usize),
}

pub fn local_date<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
  timestamp.with_timezone(tz).date_naive()
}

/// Interleave a separator before the first message of every calendar day.
pub fn build<Tz: TimeZone>(messages: &[Message], tz: &Tz) -> Vec<Entry> {
  let mut entries = Vec::with_capacity(messages.len() + 1);
  let mut current_day = None;

  for (i, message) in messages.iter().enumerate() {
    let day = local_date(&message.timestamp, tz);
    if current_day != Some(day) {
      entries.push(Entry::Separator(day));
      current_day = Some(day);
    }
    entries.push(Entry::Message(i));
  }
  entries
}

/// Whether `message` continues `prev` without its own sender/time header:
/// same sender, same day, and at most five minutes apart either way.
pub fn groups_with<Tz: TimeZone>(message: &Message, prev: Option<&Message>, tz: &Tz) -> bool {
  let Some(prev) = prev else {
    return false;
  };
  message.sender_uid == prev.sender_uid
    && local_date(&message.timestamp, tz) == local_date(&prev.timestamp, tz)
    && (message.timestamp - prev.timestamp).abs() <= TimeDelta::minutes(GROUP_WINDOW_MINUTES)
}
