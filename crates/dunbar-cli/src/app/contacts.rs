//! Contact browser: alphabetical list, fuzzy filter, detail pane, delete.

use crossterm::event::{KeyCode, KeyEvent};
use dunbar_core::{contact::Contact, source::ContactSource};
use dunbar_sync::ContactManager;
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use ratatui::{Frame, layout::Rect};
use tracing::debug;

use super::{Interactive, is_quit};
use crate::{
  confirm::{ConfirmOutcome, DeleteConfirm},
  ui,
  viewport::ListViewport,
};

pub struct ContactsApp<S> {
  /// Every local contact, sorted by name.
  pub contacts:      Vec<Contact>,
  pub filter:        String,
  /// Whether keys are going into `filter`.
  pub filter_active: bool,
  /// Position within the filtered list.
  pub list:          ListViewport,
  pub confirm:       Option<DeleteConfirm>,
  pub status_msg:    String,
  pub area:          Rect,
  manager:           ContactManager<S>,
}

impl<S: ContactSource> ContactsApp<S> {
  pub fn new(manager: ContactManager<S>) -> Self {
    Self {
      contacts: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list: ListViewport::default(),
      confirm: None,
      status_msg: String::new(),
      area: Rect::new(0, 0, 80, 24),
      manager,
    }
  }

  pub async fn load(&mut self) -> anyhow::Result<()> {
    let mut contacts = self.manager.list().await?;
    contacts.sort_by_cached_key(|c| (c.display_name().to_lowercase(), c.uid.clone()));
    self.contacts = contacts;
    self.list = ListViewport::default();
    Ok(())
  }

  // ── Filtered list ───────────────────────────────────────────────────────

  pub fn filtered(&self) -> Vec<&Contact> {
    if self.filter.is_empty() {
      return self.contacts.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .contacts
      .iter()
      .filter(|c| {
        matcher.fuzzy_match(&c.display_name(), &self.filter).is_some()
          || matcher.fuzzy_match(&c.nickname, &self.filter).is_some()
          || c
            .email_addresses
            .iter()
            .any(|e| matcher.fuzzy_match(&e.value, &self.filter).is_some())
      })
      .collect()
  }

  pub fn selected(&self) -> Option<&Contact> { self.filtered().get(self.list.cursor).copied() }

  pub fn filter_visible(&self) -> bool { self.filter_active || !self.filter.is_empty() }

  fn rows(&self) -> usize { ui::contacts::list_rows(self.area, self.filter_visible()) }

  // ── Keys ────────────────────────────────────────────────────────────────

  async fn handle_confirm_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let Some(outcome) = self.confirm.as_ref().and_then(|c| c.handle_key(key)) else {
      return Ok(true);
    };
    self.confirm = None;

    if let ConfirmOutcome::DeleteConfirmed(uid) = outcome {
      match self.manager.delete(&uid).await {
        Ok(()) => {
          debug!(%uid, "contact deleted from browser");
          self.contacts.retain(|c| c.uid != uid);
          let len = self.filtered().len();
          self.list.clamp(len, self.rows());
          self.status_msg = "Contact deleted.".into();
        }
        Err(e) => self.status_msg = format!("Error: {e}"),
      }
    }
    Ok(true)
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
      }
      KeyCode::Enter => self.filter_active = false,
      KeyCode::Backspace => {
        self.filter.pop();
      }
      KeyCode::Char(c) => self.filter.push(c),
      _ => return,
    }
    self.list = ListViewport::default();
  }

  fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    let len = self.filtered().len();
    let rows = self.rows();
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => self.list.down(len, rows),
      KeyCode::Up | KeyCode::Char('k') => self.list.up(),
      KeyCode::Home | KeyCode::Char('g') => self.list.home(),
      KeyCode::End | KeyCode::Char('G') => self.list.end(len, rows),
      KeyCode::PageUp => self.list.page_up(rows),
      KeyCode::PageDown => self.list.page_down(len, rows),

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list = ListViewport::default();
      }
      KeyCode::Esc if !self.filter.is_empty() => {
        self.filter.clear();
        self.list = ListViewport::default();
      }

      KeyCode::Char('d') => {
        if let Some(contact) = self.selected() {
          self.confirm = Some(DeleteConfirm::new(&contact.uid, contact.display_name()));
        }
      }

      _ => {}
    }
    true
  }
}

impl<S: ContactSource> Interactive for ContactsApp<S> {
  fn draw(&self, f: &mut Frame) { ui::contacts::draw(f, self); }

  fn resize(&mut self, area: Rect) {
    self.area = area;
    let len = self.filtered().len();
    self.list.clamp(len, self.rows());
  }

  async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if is_quit(&key) {
      return Ok(false);
    }
    if self.confirm.is_some() {
      return self.handle_confirm_key(key).await;
    }
    self.status_msg.clear();
    if self.filter_active {
      self.handle_filter_key(key);
      return Ok(true);
    }
    Ok(self.handle_list_key(key))
  }
}
