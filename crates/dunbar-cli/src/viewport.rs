//! Viewport layout for variable-height message lists.
//!
//! Messages render to a height that depends on wrapping, attachments, and
//! whether they group with the message above. The window is described by the
//! index of its top *message*; separators are placed around messages as the
//! window is walked. Measuring and painting both go through [`Sheet::walk`],
//! so a scroll decision always matches what is drawn.

use chrono::NaiveDate;
use dunbar_core::message::Message;

use crate::timeline::Entry;

/// A separator above the window's top message is still shown when the top
/// message is fewer than this many messages into its day.
pub const SEPARATOR_LOOKAHEAD: usize = 3;

/// Rendered heights, in terminal lines.
pub trait Measure {
  fn message_height(&self, message: &Message, prev: Option<&Message>, width: u16) -> usize;
  fn separator_height(&self, date: NaiveDate, width: u16) -> usize;
}

/// One placed display record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
  pub entry:  Entry,
  pub height: usize,
  /// The message this one is measured against for grouping.
  pub prev:   Option<usize>,
}

/// A message list laid out at a fixed width and height.
pub struct Sheet<'a, M> {
  pub messages: &'a [Message],
  pub timeline: &'a [Entry],
  pub measure:  &'a M,
  pub width:    u16,
  pub height:   usize,
}

impl<M: Measure> Sheet<'_, M> {
  pub fn len(&self) -> usize { self.messages.len() }

  pub fn is_empty(&self) -> bool { self.messages.is_empty() }

  /// Place records from message `top` until the next one would overflow.
  ///
  /// A separator is only placed together with the message after it, so the
  /// window never ends on an orphaned separator. The top message is always
  /// placed, clipped if it is taller than the window.
  pub fn walk(&self, top: usize) -> Vec<Slot> {
    let mut slots = Vec::new();
    if top >= self.messages.len() {
      return slots;
    }

    let mut used = 0;
    let mut prev: Option<usize> = None;
    let mut pending: Option<Slot> = None;
    // First skipped message of the current day, if any were skipped.
    let mut day_start: Option<usize> = None;

    for &entry in self.timeline {
      match entry {
        Entry::Separator(date) => {
          pending = Some(Slot {
            entry,
            height: self.measure.separator_height(date, self.width),
            prev: None,
          });
          day_start = None;
        }
        Entry::Message(i) if i < top => {
          day_start.get_or_insert(i);
        }
        Entry::Message(i) => {
          if i == top {
            if let Some(start) = day_start {
              if top - start >= SEPARATOR_LOOKAHEAD {
                pending = None;
              }
            }
          }

          let against = if pending.is_some() { None } else { prev };
          let height = self.measure.message_height(
            &self.messages[i],
            against.map(|p| &self.messages[p]),
            self.width,
          );
          let separator = pending.map_or(0, |s| s.height);

          if used + separator + height > self.height {
            if slots.is_empty() {
              slots.push(Slot { entry, height, prev: None });
            }
            break;
          }

          if let Some(sep) = pending.take() {
            used += sep.height;
            slots.push(sep);
          }
          used += height;
          slots.push(Slot { entry, height, prev: against });
          prev = Some(i);
        }
      }
    }
    slots
  }

  /// Messages that fit in a window starting at `top`; at least one unless
  /// `top` is past the end.
  pub fn visible_count(&self, top: usize) -> usize {
    if top >= self.messages.len() {
      return 0;
    }
    let placed = self
      .walk(top)
      .iter()
      .filter(|s| matches!(s.entry, Entry::Message(_)))
      .count();
    placed.max(1)
  }

  /// The smallest top whose window still reaches message `end - 1`, found by
  /// probing decreasing starts.
  pub fn start_reaching(&self, end: usize) -> usize {
    let mut start = end.saturating_sub(1);
    while start > 0 && start - 1 + self.visible_count(start - 1) >= end {
      start -= 1;
    }
    start
  }

  /// Top of the window that shows the last message with the screen filled.
  pub fn end_top(&self) -> usize { self.start_reaching(self.messages.len()) }
}

// ─── Message viewport ────────────────────────────────────────────────────────

/// Cursor and window top over a [`Sheet`], both message indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageViewport {
  pub cursor: usize,
  pub top:    usize,
}

impl MessageViewport {
  pub fn down<M: Measure>(&mut self, sheet: &Sheet<'_, M>) {
    if self.cursor + 1 >= sheet.len() {
      return;
    }
    self.cursor += 1;
    while self.top < self.cursor && self.cursor >= self.top + sheet.visible_count(self.top) {
      self.top += 1;
    }
  }

  pub fn up(&mut self) {
    if self.cursor == 0 {
      return;
    }
    self.cursor -= 1;
    if self.cursor < self.top {
      self.top = self.cursor;
    }
  }

  pub fn home(&mut self) { *self = Self::default(); }

  pub fn end<M: Measure>(&mut self, sheet: &Sheet<'_, M>) {
    if sheet.is_empty() {
      return;
    }
    self.cursor = sheet.len() - 1;
    self.top = sheet.end_top();
  }

  pub fn page_down<M: Measure>(&mut self, sheet: &Sheet<'_, M>) {
    if sheet.is_empty() {
      return;
    }
    let page = sheet.visible_count(self.top);
    self.top = (self.top + page).min(sheet.end_top()).max(self.top);
    self.cursor = (self.cursor + page).min(sheet.len() - 1);
    self.clamp_cursor(sheet);
  }

  pub fn page_up<M: Measure>(&mut self, sheet: &Sheet<'_, M>) {
    if sheet.is_empty() {
      return;
    }
    let page = sheet.visible_count(self.top);
    self.top = sheet.start_reaching(self.top);
    self.cursor = self.cursor.saturating_sub(page);
    self.clamp_cursor(sheet);
  }

  /// Pull the cursor into the current window.
  pub fn clamp_cursor<M: Measure>(&mut self, sheet: &Sheet<'_, M>) {
    let last = self.top + sheet.visible_count(self.top).saturating_sub(1);
    self.cursor = self.cursor.clamp(self.top, last);
  }
}

// ─── List viewport ───────────────────────────────────────────────────────────

/// Cursor and window top over a list of single-line rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListViewport {
  pub cursor: usize,
  pub top:    usize,
}

impl ListViewport {
  pub fn down(&mut self, len: usize, rows: usize) {
    let rows = rows.max(1);
    if self.cursor + 1 < len {
      self.cursor += 1;
      if self.cursor >= self.top + rows {
        self.top = self.cursor + 1 - rows;
      }
    }
  }

  pub fn up(&mut self) {
    if self.cursor > 0 {
      self.cursor -= 1;
      if self.cursor < self.top {
        self.top = self.cursor;
      }
    }
  }

  pub fn home(&mut self) { *self = Self::default(); }

  pub fn end(&mut self, len: usize, rows: usize) {
    self.cursor = len.saturating_sub(1);
    self.top = len.saturating_sub(rows.max(1));
  }

  pub fn page_up(&mut self, rows: usize) {
    let rows = rows.max(1);
    self.cursor = self.cursor.saturating_sub(rows);
    self.top = self.top.saturating_sub(rows);
  }

  pub fn page_down(&mut self, len: usize, rows: usize) {
    let rows = rows.max(1);
    self.cursor = (self.cursor + rows).min(len.saturating_sub(1));
    self.top = (self.top + rows).min(len.saturating_sub(rows));
  }

  /// Keep both indices valid after the list shrinks or the pane resizes.
  pub fn clamp(&mut self, len: usize, rows: usize) {
    let rows = rows.max(1);
    self.cursor = self.cursor.min(len.saturating_sub(1));
    self.top = self.top.min(self.cursor);
    if self.cursor >= self.top + rows {
      self.top = self.cursor + 1 - rows;
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone as _, Utc};

  use super::*;
  use crate::timeline;

  /// Every message is `message` lines tall, every separator `separator`.
  struct Fixed {
    message:   usize,
    separator: usize,
  }

  impl Measure for Fixed {
    fn message_height(&self, _: &Message, _: Option<&Message>, _: u16) -> usize { self.message }

    fn separator_height(&self, _: NaiveDate, _: u16) -> usize { self.separator }
  }

  const TWO_LINES: Fixed = Fixed { message: 2, separator: 0 };

  /// `counts[d]` messages on day `d`, one minute apart.
  fn days(counts: &[usize]) -> Vec<Message> {
    let mut messages = Vec::new();
    for (day, &count) in counts.iter().enumerate() {
      for n in 0..count {
        messages.push(Message {
          id: format!("{day}-{n}"),
          sender_uid: "a".into(),
          timestamp: Utc
            .with_ymd_and_hms(2024, 3, 10 + day as u32, 12, n as u32, 0)
            .unwrap(),
          ..Message::default()
        });
      }
    }
    messages
  }

  fn sheet<'a, M: Measure>(
    messages: &'a [Message],
    timeline: &'a [Entry],
    measure: &'a M,
    height: usize,
  ) -> Sheet<'a, M> {
    Sheet { messages, timeline, measure, width: 80, height }
  }

  #[test]
  fn visible_count_never_counts_partial_messages() {
    let messages = days(&[10]);
    let entries = timeline::build(&messages, &Utc);

    assert_eq!(sheet(&messages, &entries, &TWO_LINES, 10).visible_count(0), 5);
    assert_eq!(sheet(&messages, &entries, &TWO_LINES, 9).visible_count(0), 4);
  }

  #[test]
  fn visible_count_minimum_and_bounds() {
    let messages = days(&[3]);
    let entries = timeline::build(&messages, &Utc);
    let tall = Fixed { message: 20, separator: 2 };
    let s = sheet(&messages, &entries, &tall, 10);

    assert_eq!(s.visible_count(0), 1);
    assert_eq!(s.visible_count(3), 0);
    assert_eq!(s.walk(0).len(), 1);
  }

  #[test]
  fn separators_take_space() {
    let messages = days(&[2, 2]);
    let entries = timeline::build(&messages, &Utc);
    let measure = Fixed { message: 2, separator: 2 };

    // sep, m0, m1, sep, m2 = 10 lines
    assert_eq!(sheet(&messages, &entries, &measure, 10).visible_count(0), 3);
    assert_eq!(sheet(&messages, &entries, &measure, 11).visible_count(0), 3);
    assert_eq!(sheet(&messages, &entries, &measure, 12).visible_count(0), 4);
  }

  #[test]
  fn separator_is_never_orphaned_at_bottom() {
    let messages = days(&[3, 3]);
    let entries = timeline::build(&messages, &Utc);
    let measure = Fixed { message: 2, separator: 2 };

    // sep + 3 messages = 8 lines; the next separator would fit alone.
    let slots = sheet(&messages, &entries, &measure, 10).walk(0);
    assert_eq!(slots.len(), 4);
    assert!(matches!(slots.last().unwrap().entry, Entry::Message(2)));
  }

  #[test]
  fn day_separator_lookahead_at_top() {
    let messages = days(&[6]);
    let entries = timeline::build(&messages, &Utc);
    let measure = Fixed { message: 2, separator: 2 };
    let s = sheet(&messages, &entries, &measure, 20);

    assert!(matches!(s.walk(0)[0].entry, Entry::Separator(_)));
    assert!(matches!(s.walk(2)[0].entry, Entry::Separator(_)));
    assert_eq!(s.walk(3)[0].entry, Entry::Message(3));
  }

  #[test]
  fn grouping_is_reset_after_separator() {
    let messages = days(&[2, 2]);
    let entries = timeline::build(&messages, &Utc);
    let measure = Fixed { message: 2, separator: 2 };

    let slots = sheet(&messages, &entries, &measure, 40).walk(0);
    let prevs: Vec<_> = slots
      .iter()
      .filter(|s| matches!(s.entry, Entry::Message(_)))
      .map(|s| s.prev)
      .collect();
    assert_eq!(prevs, [None, Some(0), None, Some(2)]);
  }

  #[test]
  fn end_fills_the_screen() {
    let messages = days(&[10]);
    let entries = timeline::build(&messages, &Utc);
    let s = sheet(&messages, &entries, &TWO_LINES, 10);

    let mut viewport = MessageViewport::default();
    viewport.end(&s);
    assert_eq!(viewport, MessageViewport { cursor: 9, top: 5 });
    assert_eq!(viewport.top + s.visible_count(viewport.top), messages.len());
  }

  #[test]
  fn scroll_down_moves_top_only_when_cursor_leaves_window() {
    let messages = days(&[10]);
    let entries = timeline::build(&messages, &Utc);
    let s = sheet(&messages, &entries, &TWO_LINES, 10);

    let mut viewport = MessageViewport::default();
    for _ in 0..4 {
      viewport.down(&s);
    }
    assert_eq!(viewport, MessageViewport { cursor: 4, top: 0 });
    viewport.down(&s);
    assert_eq!(viewport, MessageViewport { cursor: 5, top: 1 });

    for _ in 0..10 {
      viewport.down(&s);
    }
    assert_eq!(viewport, MessageViewport { cursor: 9, top: 5 });

    for _ in 0..4 {
      viewport.up();
    }
    assert_eq!(viewport, MessageViewport { cursor: 5, top: 5 });
    viewport.up();
    assert_eq!(viewport, MessageViewport { cursor: 4, top: 4 });

    viewport.home();
    assert_eq!(viewport, MessageViewport::default());
  }

  #[test]
  fn paging() {
    let messages = days(&[12]);
    let entries = timeline::build(&messages, &Utc);
    let s = sheet(&messages, &entries, &TWO_LINES, 10);

    let mut viewport = MessageViewport::default();
    viewport.page_down(&s);
    assert_eq!(viewport, MessageViewport { cursor: 5, top: 5 });
    viewport.page_down(&s);
    assert_eq!(viewport, MessageViewport { cursor: 10, top: 7 });
    viewport.page_up(&s);
    assert_eq!(viewport, MessageViewport { cursor: 5, top: 2 });
    viewport.page_up(&s);
    assert_eq!(viewport, MessageViewport { cursor: 0, top: 0 });
  }

  #[test]
  fn empty_sheet() {
    let s = sheet(&[], &[], &TWO_LINES, 10);
    let mut viewport = MessageViewport::default();
    viewport.down(&s);
    viewport.end(&s);
    viewport.page_down(&s);
    assert_eq!(viewport, MessageViewport::default());
    assert!(s.walk(0).is_empty());
  }

  #[test]
  fn list_viewport() {
    let mut list = ListViewport::default();
    for _ in 0..5 {
      list.down(20, 4);
    }
    assert_eq!(list, ListViewport { cursor: 5, top: 2 });

    list.page_down(20, 4);
    assert_eq!(list, ListViewport { cursor: 9, top: 6 });
    list.end(20, 4);
    assert_eq!(list, ListViewport { cursor: 19, top: 16 });
    list.page_up(4);
    assert_eq!(list, ListViewport { cursor: 15, top: 12 });

    list.clamp(3, 4);
    assert_eq!(list, ListViewport { cursor: 2, top: 2 });
    list.home();
    list.up();
    assert_eq!(list, ListViewport::default());
  }
}
