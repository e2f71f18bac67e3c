//! Setup form rendering.

use ratatui::{
  Frame,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use super::centered;
use crate::prompt::{Form, Kind, Step};

pub fn draw(f: &mut Frame, form: &Form) {
  let Some(step) = form.current() else {
    return;
  };
  let (index, total) = form.position();

  let mut lines = step_lines(step);
  if let Some(error) = form.error() {
    lines.push(Line::from(""));
    lines.push(Line::styled(format!("✗ {error}"), Style::default().fg(Color::Red)));
  }
  lines.push(Line::from(""));
  lines.push(Line::styled(hints(&step.kind), Style::default().fg(Color::DarkGray)));

  let area = f.area();
  let width = area.width.saturating_sub(4).min(80);
  let height = (lines.len() as u16 + 4).min(area.height);
  let rect = centered(area, width, height);

  let block = Block::default()
    .title(format!(" dunbar setup {index}/{total} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  f.render_widget(
    Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
    rect,
  );
}

fn hints(kind: &Kind) -> &'static str {
  match kind {
    Kind::Note => "enter: continue • esc: cancel",
    Kind::Select { .. } => "j/k: move • enter: select • esc: cancel",
    Kind::Confirm { .. } => "y/n: answer • ←/→: toggle • enter: submit • esc: cancel",
    Kind::Input { .. } => "enter: submit • esc: cancel",
  }
}

/// Title, description, and the widget for one step.
pub fn step_lines(step: &Step) -> Vec<Line<'static>> {
  let mut lines = vec![Line::styled(
    step.title.clone(),
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  )];
  if !step.description.is_empty() {
    lines.extend(step.description.lines().map(|l| Line::from(l.to_string())));
  }
  lines.push(Line::from(""));

  let highlight = Style::default()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

  match &step.kind {
    Kind::Note => {}

    Kind::Select { options, cursor } => {
      for (i, option) in options.iter().enumerate() {
        if i == *cursor {
          lines.push(Line::styled(format!("> {}", option.label), Style::default().fg(Color::Cyan)));
        } else {
          lines.push(Line::from(format!("  {}", option.label)));
        }
      }
    }

    Kind::Confirm { affirmative, negative, value } => {
      let (yes, no) = if *value {
        (highlight, Style::default())
      } else {
        (Style::default(), highlight)
      };
      lines.push(Line::from(vec![
        Span::styled(format!(" {affirmative} "), yes),
        Span::raw("   "),
        Span::styled(format!(" {negative} "), no),
      ]));
    }

    Kind::Input { value, secret, .. } => {
      let shown = if *secret {
        "•".repeat(value.chars().count())
      } else {
        value.clone()
      };
      lines.push(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(shown),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
      ]));
    }
  }
  lines
}

#[cfg(test)]
mod tests {
  use super::*;

  fn text(lines: &[Line<'_>]) -> Vec<String> {
    lines
      .iter()
      .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
      .collect()
  }

  #[test]
  fn secret_input_is_masked() {
    let mut step = Step::input("client_secret", "Client Secret").secret();
    if let Kind::Input { value, .. } = &mut step.kind {
      value.push_str("abc");
    }
    let lines = text(&step_lines(&step));
    assert_eq!(lines.last().map(String::as_str), Some("> •••_"));
  }

  #[test]
  fn description_lines_follow_title() {
    let step = Step::note("Beeper Setup", "1. Open Beeper Desktop\n2. Settings");
    let lines = text(&step_lines(&step));
    assert_eq!(lines[..3], ["Beeper Setup", "1. Open Beeper Desktop", "2. Settings"]);
  }
}
