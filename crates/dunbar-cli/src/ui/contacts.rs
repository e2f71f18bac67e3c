//! Contacts screen: list pane on the left, detail pane on the right.

use dunbar_core::{contact::Contact, source::ContactSource};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Paragraph, Wrap},
};

use super::{columns, dialog, draw_empty, draw_header, draw_status, frame_rows, pane};
use crate::app::ContactsApp;

pub const EMPTY_TEXT: &str =
  "No contacts found. Run 'dunbar contacts sync' to sync your contacts.\n\nPress 'q' to quit.";

/// Inner area of the list pane.
fn list_inner(area: Rect) -> Rect {
  let (_, body, _) = frame_rows(area);
  let (left, _) = columns(body);
  pane("").inner(left)
}

/// Rows available for contact names; the filter bar takes one when shown.
pub fn list_rows(area: Rect, filter_shown: bool) -> usize {
  let rows = usize::from(list_inner(area).height);
  if filter_shown { rows.saturating_sub(1) } else { rows }
}

pub fn draw<S: ContactSource>(f: &mut Frame, app: &ContactsApp<S>) {
  let area = f.area();
  let (header, body, status) = frame_rows(area);

  draw_header(f, header, "contacts");

  if app.contacts.is_empty() {
    draw_empty(f, body, EMPTY_TEXT);
  } else {
    let (left, right) = columns(body);
    draw_list(f, left, app);
    match app.selected() {
      Some(contact) => draw_detail(f, right, contact),
      None => f.render_widget(
        Paragraph::new("No matching contacts.")
          .style(Style::default().fg(Color::DarkGray))
          .block(pane(" Detail ")),
        right,
      ),
    }
  }

  let (mode, hints) = if app.confirm.is_some() {
    ("DELETE", "y confirm  n cancel")
  } else if app.filter_active {
    ("SEARCH", "Type to filter  Esc clear  Enter keep")
  } else {
    ("NORMAL", "j/k: down/up • g/G: top/bottom • /: filter • d: delete • q: quit")
  };
  draw_status(f, status, mode, hints, &app.status_msg);

  if let Some(confirm) = &app.confirm {
    dialog::draw(f, body, "Contact", confirm);
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

fn draw_list<S: ContactSource>(f: &mut Frame, area: Rect, app: &ContactsApp<S>) {
  let filtered = app.filtered();
  let title = if app.filter_visible() {
    format!(" Contacts ({}/{}) ", filtered.len(), app.contacts.len())
  } else {
    format!(" Contacts ({}) ", app.contacts.len())
  };
  let block = pane(title);
  let mut inner = block.inner(area);
  f.render_widget(block, area);

  if app.filter_visible() && inner.height > 0 {
    let filter_area = Rect { y: inner.y + inner.height - 1, height: 1, ..inner };
    inner.height -= 1;
    let text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::Yellow)), filter_area);
  }

  let selected = Style::default()
    .bg(Color::Blue)
    .fg(Color::White)
    .add_modifier(Modifier::BOLD);
  let lines: Vec<Line> = filtered
    .iter()
    .enumerate()
    .skip(app.list.top)
    .take(inner.height.into())
    .map(|(i, contact)| {
      let style = if i == app.list.cursor { selected } else { Style::default() };
      Line::styled(format!(" {}", contact.display_name()), style)
    })
    .collect();
  f.render_widget(Paragraph::new(lines), inner);
}

// ─── Detail ───────────────────────────────────────────────────────────────────

fn draw_detail(f: &mut Frame, area: Rect, contact: &Contact) {
  let block = pane(" Detail ");
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(detail_lines(contact)).wrap(Wrap { trim: false }),
    inner,
  );
}

fn section(lines: &mut Vec<Line<'static>>, heading: &'static str) {
  lines.push(Line::from(""));
  lines.push(Line::styled(
    heading,
    Style::default()
      .fg(Color::Magenta)
      .add_modifier(Modifier::BOLD),
  ));
}

fn field(label: &str, value: &str) -> Line<'static> {
  Line::from(vec![
    Span::styled(format!("  {label}:"), Style::default().fg(Color::DarkGray)),
    Span::raw(" "),
    Span::raw(value.to_string()),
  ])
}

fn value(indent: usize, text: &str) -> Line<'static> {
  Line::from(format!("{}{text}", " ".repeat(indent)))
}

pub fn detail_lines(contact: &Contact) -> Vec<Line<'static>> {
  let mut lines = vec![Line::styled(
    format!("👤 {}", contact.display_name()),
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  )];
  if !contact.nickname.is_empty() {
    lines.push(Line::from(vec![
      Span::styled("   aka ", Style::default().fg(Color::DarkGray)),
      Span::raw(contact.nickname.clone()),
    ]));
  }

  if !contact.phone_numbers.is_empty() {
    section(&mut lines, "📞 Phone");
    for phone in &contact.phone_numbers {
      lines.push(field(&phone.kind, &phone.value));
    }
  }

  if !contact.email_addresses.is_empty() {
    section(&mut lines, "📧 Email");
    for email in &contact.email_addresses {
      lines.push(field(&email.kind, &email.value));
    }
  }

  if let Some(org) = contact.organization.as_ref().filter(|o| !o.name.is_empty()) {
    section(&mut lines, "💼 Work");
    lines.push(field("Company", &org.name));
    if !org.title.is_empty() {
      lines.push(field("Title", &org.title));
    }
    if !org.department.is_empty() {
      lines.push(field("Department", &org.department));
    }
  }

  if !contact.addresses.is_empty() {
    section(&mut lines, "🏠 Address");
    for addr in &contact.addresses {
      lines.push(Line::styled(format!("  {}:", addr.kind), Style::default().fg(Color::DarkGray)));
      if !addr.street.is_empty() {
        lines.push(value(4, &addr.street));
      }
      let locality: Vec<&str> = [&addr.city, &addr.state, &addr.postal_code]
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect();
      if !locality.is_empty() {
        lines.push(value(4, &locality.join(", ")));
      }
      if !addr.country.is_empty() {
        lines.push(value(4, &addr.country));
      }
    }
  }

  if let Some(birthday) = contact.birthday {
    section(&mut lines, "🎂 Birthday");
    lines.push(value(2, &birthday.format("%B %-d, %Y").to_string()));
  }

  if !contact.tags.is_empty() {
    section(&mut lines, "🏷  Tags");
    let tags: Vec<&str> = contact.tags.iter().map(String::as_str).collect();
    lines.push(value(2, &tags.join(", ")));
  }

  if !contact.notes.is_empty() {
    section(&mut lines, "📝 Notes");
    lines.push(value(2, &contact.notes));
  }

  lines
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use dunbar_core::contact::{Organization, PhoneNumber};

  use super::*;

  fn text(lines: &[Line<'_>]) -> Vec<String> {
    lines
      .iter()
      .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
      .collect()
  }

  #[test]
  fn detail_sections_only_for_present_fields() {
    let contact = Contact {
      uid: "c1".into(),
      full_name: "Ada Lovelace".into(),
      nickname: "Countess".into(),
      phone_numbers: vec![PhoneNumber { value: "555".into(), kind: "mobile".into() }],
      organization: Some(Organization { name: "Analytical".into(), ..Organization::default() }),
      birthday: NaiveDate::from_ymd_opt(1815, 12, 10),
      ..Contact::default()
    };

    let lines = text(&detail_lines(&contact));
    assert_eq!(lines[0], "👤 Ada Lovelace");
    assert_eq!(lines[1], "   aka Countess");
    assert!(lines.contains(&"📞 Phone".to_string()));
    assert!(lines.contains(&"  mobile: 555".to_string()));
    assert!(lines.contains(&"  Company: Analytical".to_string()));
    assert!(lines.contains(&"  December 10, 1815".to_string()));
    assert!(!lines.contains(&"📧 Email".to_string()));
    assert!(!lines.iter().any(|l| l.starts_with("  Title")));
  }

  #[test]
  fn filter_bar_takes_a_row() {
    let area = Rect::new(0, 0, 80, 24);
    // 24 rows minus header, status, and the pane border.
    assert_eq!(list_rows(area, false), 20);
    assert_eq!(list_rows(area, true), 19);
  }
}
