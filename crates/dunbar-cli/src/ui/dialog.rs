//! Delete confirmation dialog drawn over the body.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered;
use crate::confirm::DeleteConfirm;

/// `noun` is the record kind, e.g. `Contact`.
pub fn draw(f: &mut Frame, area: Rect, noun: &str, confirm: &DeleteConfirm) {
  let lines = vec![
    Line::styled(
      format!("⚠️  Delete {noun}?"),
      Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD),
    ),
    Line::from(""),
    Line::from("Are you sure you want to delete:"),
    Line::styled(confirm.label.clone(), Style::default().add_modifier(Modifier::BOLD)),
    Line::from(""),
    Line::styled("This action cannot be undone.", Style::default().fg(Color::DarkGray)),
    Line::from(""),
    Line::styled("[Y]es   [N]o", Style::default().fg(Color::Yellow)),
  ];

  let rect = centered(area, 50, lines.len() as u16 + 2);
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  f.render_widget(Clear, rect);
  f.render_widget(
    Paragraph::new(lines)
      .centered()
      .wrap(Wrap { trim: true })
      .block(block),
    rect,
  );
}
