//! Messages screen: conversation list with a preview pane, and the
//! full-height message detail view.

use chrono::TimeZone;
use dunbar_core::{message::Conversation, source::MessageSource};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use super::{columns, dialog, draw_empty, draw_header, draw_status, frame_rows, pane};
use crate::{
  app::{
    MessagesApp,
    messages::{Screen, sheet},
  },
  render::MessageRenderer,
  timeline::Entry,
  viewport::Sheet,
};

pub const EMPTY_TEXT: &str =
  "No conversations found. Run 'dunbar messages sync' to sync your messages.\n\nPress 'q' to quit.";

/// Height of the conversation list pane's interior.
pub fn list_rows(area: Rect) -> usize {
  let (_, body, _) = frame_rows(area);
  let (left, _) = columns(body);
  pane("").inner(left).height.into()
}

/// Inner area of the message detail pane.
pub fn detail_body(area: Rect) -> Rect {
  let (_, body, _) = frame_rows(area);
  pane("").inner(body)
}

/// `[Platform] Title (unread)`.
pub fn conversation_label(conversation: &Conversation) -> String {
  let mut label = format!("[{}] {}", conversation.platform, conversation.title);
  if conversation.unread_count > 0 {
    label.push_str(&format!(" ({})", conversation.unread_count));
  }
  label
}

pub fn draw<S: MessageSource, Tz: TimeZone>(f: &mut Frame, app: &MessagesApp<S, Tz>) {
  let area = f.area();
  let (header, body, status) = frame_rows(area);

  let (mode, hints) = match app.screen {
    Screen::ConversationList => {
      draw_header(f, header, "messages");
      if app.conversations.is_empty() {
        draw_empty(f, body, EMPTY_TEXT);
      } else {
        let (left, right) = columns(body);
        draw_list(f, left, app);
        draw_preview(f, right, app);
      }
      ("LIST", "j/k: down/up • g/G: top/bottom • enter: open • d: delete • q: quit")
    }
    Screen::MessageDetail => {
      draw_header(f, header, "messages");
      draw_detail(f, body, app);
      ("DETAIL", "j/k: down/up • g/G: top/bottom • pgup/pgdn: page • d: delete • esc: back")
    }
  };
  let (mode, hints) =
    if app.confirm.is_some() { ("DELETE", "y confirm  n cancel") } else { (mode, hints) };
  draw_status(f, status, mode, hints, &app.status_msg);

  if let Some(confirm) = &app.confirm {
    dialog::draw(f, body, "Conversation", confirm);
  }
}

// ─── Conversation list ────────────────────────────────────────────────────────

fn draw_list<S: MessageSource, Tz: TimeZone>(f: &mut Frame, area: Rect, app: &MessagesApp<S, Tz>) {
  let block = pane(format!(" Conversations ({}) ", app.conversations.len()));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let selected = Style::default()
    .bg(Color::Blue)
    .fg(Color::White)
    .add_modifier(Modifier::BOLD);
  let lines: Vec<Line> = app
    .conversations
    .iter()
    .enumerate()
    .skip(app.list.top)
    .take(inner.height.into())
    .map(|(i, conversation)| {
      let style = if i == app.list.cursor { selected } else { Style::default() };
      Line::styled(format!(" {}", conversation_label(conversation)), style)
    })
    .collect();
  f.render_widget(Paragraph::new(lines), inner);
}

fn draw_preview<S: MessageSource, Tz: TimeZone>(
  f: &mut Frame,
  area: Rect,
  app: &MessagesApp<S, Tz>,
) {
  let title = app
    .selected()
    .map(|c| format!(" {} ", c.title))
    .unwrap_or_default();
  let block = pane(title);
  let inner = block.inner(area);
  f.render_widget(block, area);

  if app.preview.is_empty() {
    f.render_widget(
      Paragraph::new("No messages.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  // The pane shows the newest messages.
  let sheet = sheet(&app.preview, &app.preview_timeline, &app.renderer, inner);
  let top = sheet.end_top();
  f.render_widget(Paragraph::new(paint(&sheet, &app.renderer, top, None)), inner);
}

// ─── Message detail ───────────────────────────────────────────────────────────

fn draw_detail<S: MessageSource, Tz: TimeZone>(
  f: &mut Frame,
  area: Rect,
  app: &MessagesApp<S, Tz>,
) {
  let conversation = app
    .open
    .as_deref()
    .and_then(|id| app.conversations.iter().find(|c| c.id == id));
  let title = conversation.map(conversation_label).unwrap_or_default();
  let block = pane(Line::from(vec![
    Span::raw(" "),
    Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
    Span::raw(format!(" · {} messages ", app.messages.len())),
  ]));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if app.messages.is_empty() {
    f.render_widget(
      Paragraph::new("No messages in this conversation.")
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let sheet = sheet(&app.messages, &app.timeline, &app.renderer, inner);
  let lines = paint(&sheet, &app.renderer, app.viewport.top, Some(app.viewport.cursor));
  f.render_widget(Paragraph::new(lines), inner);
}

/// Lines for the window starting at message `top`, exactly as measured.
pub fn paint<Tz: TimeZone>(
  sheet: &Sheet<'_, MessageRenderer<Tz>>,
  renderer: &MessageRenderer<Tz>,
  top: usize,
  cursor: Option<usize>,
) -> Vec<Line<'static>> {
  let mut lines = Vec::new();
  for slot in sheet.walk(top) {
    match slot.entry {
      Entry::Separator(date) => lines.extend(renderer.separator_lines(date, sheet.width)),
      Entry::Message(i) => {
        let prev = slot.prev.map(|p| &sheet.messages[p]);
        let selected = cursor == Some(i);
        lines.extend(renderer.message_lines(&sheet.messages[i], prev, sheet.width, selected));
      }
    }
  }
  lines
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn label_shows_unread_count() {
    let mut conversation = Conversation {
      platform: "signal".into(),
      title: "Ada".into(),
      ..Conversation::default()
    };
    assert_eq!(conversation_label(&conversation), "[signal] Ada");
    conversation.unread_count = 3;
    assert_eq!(conversation_label(&conversation), "[signal] Ada (3)");
  }

  #[test]
  fn detail_body_is_inside_the_frame() {
    let body = detail_body(Rect::new(0, 0, 80, 24));
    assert_eq!(body, Rect::new(1, 2, 78, 20));
  }
}
