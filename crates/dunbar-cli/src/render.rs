//! Message and date-separator rendering.
//!
//! [`MessageRenderer`] produces the exact lines painted for a message, and
//! its [`Measure`] impl reports the length of those same lines.

use chrono::{DateTime, Datelike as _, Days, Local, NaiveDate, TimeZone, Utc};
use dunbar_core::message::{Attachment, AttachmentKind, Message};
use ratatui::{
  style::{Color, Modifier, Style},
  text::{Line, Span},
};
use textwrap::core::display_width;

use crate::{
  timeline::{self, Entry, groups_with},
  viewport::Measure,
};

/// Longest message text shown in the conversation preview pane.
pub const PREVIEW_CHARS: usize = 200;

const INDENT: usize = 2;
const MARGIN: usize = 2;

/// Renders messages for one display time zone relative to a fixed "now".
pub struct MessageRenderer<Tz: TimeZone> {
  tz:  Tz,
  now: DateTime<Tz>,
}

impl MessageRenderer<Local> {
  pub fn local() -> Self { Self::new(Local, Local::now()) }
}

impl<Tz: TimeZone> MessageRenderer<Tz> {
  pub fn new(tz: Tz, now: DateTime<Tz>) -> Self { Self { tz, now } }

  pub fn timeline(&self, messages: &[Message]) -> Vec<Entry> { timeline::build(messages, &self.tz) }

  // ── Labels ──────────────────────────────────────────────────────────────

  /// Time of day today, weekday and time within a week, else the date.
  pub fn format_time(&self, timestamp: &DateTime<Utc>) -> String {
    let local = timestamp.with_timezone(&self.tz).naive_local();
    let now = self.now.naive_local();
    let age = self.now.naive_utc() - timestamp.naive_utc();

    let format = if local.date() == now.date() {
      "%-I:%M %p"
    } else if age >= chrono::TimeDelta::zero() && age < chrono::TimeDelta::days(7) {
      "%a %-I:%M %p"
    } else if local.year() == now.year() {
      "%b %-d"
    } else {
      "%b %-d, %Y"
    };
    local.format(format).to_string()
  }

  /// Separator label for a calendar day. Weeks start on Sunday.
  pub fn date_label(&self, date: NaiveDate) -> String {
    let today = self.now.date_naive();
    if date == today {
      return "Today".into();
    }
    if today.pred_opt() == Some(date) {
      return "Yesterday".into();
    }

    let week_start = today
      .checked_sub_days(Days::new(today.weekday().num_days_from_sunday().into()))
      .unwrap_or(today);
    if date >= week_start && date < today {
      date.format("%A").to_string()
    } else if date.year() == today.year() {
      date.format("%a, %b %-d").to_string()
    } else {
      date.format("%a, %b %-d, %Y").to_string()
    }
  }

  // ── Lines ───────────────────────────────────────────────────────────────

  /// A centred rule with the date label, then one blank line.
  pub fn separator_lines(&self, date: NaiveDate, width: u16) -> Vec<Line<'static>> {
    let label = self.date_label(date);
    let width = usize::from(width);
    let label_width = display_width(&label) + 2;
    let label_style = Style::default().fg(Color::Gray);

    let rule = if label_width + 4 >= width {
      Line::from(Span::styled(label, label_style))
    } else {
      let left = (width - label_width) / 2;
      let right = width - label_width - left;
      let rule_style = Style::default().fg(Color::DarkGray);
      Line::from(vec![
        Span::styled("─".repeat(left), rule_style),
        Span::styled(format!(" {label} "), label_style),
        Span::styled("─".repeat(right), rule_style),
      ])
    };
    vec![rule, Line::default()]
  }

  /// Spacer, header, and wrapped body of one message.
  ///
  /// Messages that group with `prev` have neither spacer nor header. Sent
  /// messages are right-aligned.
  pub fn message_lines(
    &self,
    message: &Message,
    prev: Option<&Message>,
    width: u16,
    selected: bool,
  ) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let grouped = groups_with(message, prev, &self.tz);
    let base = if selected {
      Style::default().bg(Color::Indexed(236))
    } else {
      Style::default()
    };

    let mut lines = Vec::new();
    if !grouped && prev.is_some() {
      lines.push(Line::default());
    }

    if !grouped {
      let time = self.format_time(&message.timestamp);
      let dim = base.fg(Color::DarkGray);
      let time_style = base.fg(Color::Gray);

      if message.is_sent {
        let pad = width.saturating_sub(display_width(&format!("You · {time}")) + MARGIN);
        lines.push(Line::from(vec![
          Span::styled(" ".repeat(pad), base),
          Span::styled("You", base.fg(Color::Magenta).add_modifier(Modifier::BOLD)),
          Span::styled(" · ", dim),
          Span::styled(time, time_style),
        ]));
      } else {
        let sender = if message.sender_name.is_empty() {
          message.sender_uid.clone()
        } else {
          message.sender_name.clone()
        };
        lines.push(Line::from(vec![
          Span::styled(sender, base.fg(Color::LightBlue).add_modifier(Modifier::BOLD)),
          Span::styled(" · ", dim),
          Span::styled(time, time_style),
        ]));
      }
    }

    let text_style = if message.is_sent {
      base.fg(Color::Gray)
    } else {
      base.fg(Color::White)
    };
    for row in wrap(&body_text(message), width.saturating_sub(INDENT + MARGIN)) {
      let pad = if message.is_sent {
        width.saturating_sub(display_width(&row) + INDENT + MARGIN) + INDENT
      } else {
        INDENT
      };
      lines.push(Line::from(Span::styled(format!("{}{row}", " ".repeat(pad)), text_style)));
    }
    lines
  }
}

impl<Tz: TimeZone> Measure for MessageRenderer<Tz> {
  fn message_height(&self, message: &Message, prev: Option<&Message>, width: u16) -> usize {
    self.message_lines(message, prev, width, false).len()
  }

  fn separator_height(&self, date: NaiveDate, width: u16) -> usize {
    self.separator_lines(date, width).len()
  }
}

// ─── Text ────────────────────────────────────────────────────────────────────

fn wrap(text: &str, width: usize) -> Vec<String> {
  if text.trim().is_empty() {
    return vec![String::new()];
  }
  textwrap::wrap(text, width.max(1))
    .into_iter()
    .map(|row| row.into_owned())
    .collect()
}

/// `📷 Image`, `🎥 2 Videos`, ... joined in a fixed order.
pub fn attachment_summary(attachments: &[Attachment]) -> Option<String> {
  const KINDS: [(AttachmentKind, &str, &str, &str); 4] = [
    (AttachmentKind::Img, "📷", "Image", "Images"),
    (AttachmentKind::Video, "🎥", "Video", "Videos"),
    (AttachmentKind::Audio, "🎵", "Audio", "Audio"),
    (AttachmentKind::Unknown, "📎", "File", "Files"),
  ];

  let parts: Vec<String> = KINDS
    .iter()
    .filter_map(|&(kind, icon, one, many)| {
      match attachments.iter().filter(|a| a.kind == kind).count() {
        0 => None,
        1 => Some(format!("{icon} {one}")),
        n => Some(format!("{icon} {n} {many}")),
      }
    })
    .collect();
  (!parts.is_empty()).then(|| parts.join(", "))
}

/// Message text with any attachment indicators prefixed.
pub fn body_text(message: &Message) -> String {
  match attachment_summary(&message.attachments) {
    Some(summary) if message.content.is_empty() => format!("[{summary}]"),
    Some(summary) => format!("[{summary}] {}", message.content),
    None => message.content.clone(),
  }
}

/// Shorten text longer than [`PREVIEW_CHARS`] to 197 characters plus `...`.
pub fn truncate_preview(text: &str) -> String {
  if text.chars().count() <= PREVIEW_CHARS {
    return text.to_string();
  }
  let mut short: String = text.chars().take(PREVIEW_CHARS - 3).collect();
  short.push_str("...");
  short
}
