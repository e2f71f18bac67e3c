//! TUI rendering. Layout helpers here are pure functions of the terminal
//! area so the screens can size their viewports without a frame.

pub mod contacts;
pub mod dialog;
pub mod messages;
pub mod prompt;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use textwrap::core::display_width;

// ─── Layout ───────────────────────────────────────────────────────────────────

/// Header, body, and status bar.
pub fn frame_rows(area: Rect) -> (Rect, Rect, Rect) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);
  (rows[0], rows[1], rows[2])
}

/// List pane (40%) and detail pane (60%).
pub fn columns(body: Rect) -> (Rect, Rect) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(body);
  (cols[0], cols[1])
}

/// Bordered pane with a title.
pub fn pane<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

/// A `width` x `height` rect centred in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
    .flex(Flex::Center)
    .areas(area);
  let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
    .flex(Flex::Center)
    .areas(row);
  rect
}

// ─── Header ───────────────────────────────────────────────────────────────────

pub fn draw_header(f: &mut Frame, area: Rect, title: &str) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    format!(" dunbar · {title}"),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = usize::from(area.width)
    .saturating_sub(display_width(&left.content))
    .saturating_sub(display_width(&right.content));

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

/// Mode badge followed by the status message, or the key hints when there is
/// no message.
pub fn draw_status(f: &mut Frame, area: Rect, mode: &str, hints: &str, status_msg: &str) {
  let status = if status_msg.is_empty() { hints } else { status_msg };

  let mode_span = Span::styled(
    format!(" {mode} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Empty state ──────────────────────────────────────────────────────────────

/// Prompt shown in place of the panes when the store is empty.
pub fn draw_empty(f: &mut Frame, area: Rect, text: &str) {
  let height = u16::try_from(text.lines().count()).unwrap_or(u16::MAX);
  let rect = centered(area, area.width.saturating_sub(4), height);
  f.render_widget(
    Paragraph::new(text)
      .style(Style::default().fg(Color::Gray))
      .centered()
      .wrap(Wrap { trim: false }),
    rect,
  );
}
