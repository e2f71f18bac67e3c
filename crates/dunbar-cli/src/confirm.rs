//! Delete confirmation sub-state shared by the list screens.

use crossterm::event::{KeyCode, KeyEvent};

/// Terminal outcomes of a [`DeleteConfirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
  /// Carries the id of the record to delete.
  DeleteConfirmed(String),
  DeleteCancelled,
}

/// Pending deletion of one record. While present it receives every key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirm {
  pub id:    String,
  /// Name shown in the dialog.
  pub label: String,
}

impl DeleteConfirm {
  pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
    Self { id: id.into(), label: label.into() }
  }

  /// `None` while still waiting for an answer.
  pub fn handle_key(&self, key: KeyEvent) -> Option<ConfirmOutcome> {
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => {
        Some(ConfirmOutcome::DeleteConfirmed(self.id.clone()))
      }
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
        Some(ConfirmOutcome::DeleteCancelled)
      }
      _ => None,
    }
  }
}
