//! Interactive screen state machines and key dispatch.
//!
//! Each screen owns its state and a manager; [`crate::tui`] only feeds it
//! key and resize events and asks it to draw.

pub mod contacts;
pub mod messages;


use std::future::Future;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Frame, layout::Rect};

pub use self::{contacts::ContactsApp, messages::MessagesApp};
use crate::{
  prompt::{Form, Progress},
  ui,
};

/// Something the terminal loop can drive.
pub trait Interactive {
  fn draw(&self, f: &mut Frame);

  /// Called with the full terminal area before the first frame and on every
  /// resize.
  fn resize(&mut self, area: Rect);

  /// Process one key press. Returns `false` to leave the loop.
  fn handle_key(&mut self, key: KeyEvent) -> impl Future<Output = anyhow::Result<bool>>;
}

impl Interactive for Form {
  fn draw(&self, f: &mut Frame) { ui::prompt::draw(f, self); }

  fn resize(&mut self, _area: Rect) {}

  async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    Ok(self.feed(key) == Progress::Editing)
  }
}

fn is_quit(key: &KeyEvent) -> bool {
  key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}
