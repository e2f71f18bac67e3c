//! Multi-step setup forms as an explicit state machine.
//!
//! A [`Form`] is a list of [`Step`]s advanced by key events. Nothing is
//! written by the form itself; callers read the answers once it reports
//! [`Progress::Submitted`], so cancelling never leaves partial state behind.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

/// Empty input for a required field. Recoverable: the step stays active.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

// ─── Steps ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
  pub value: String,
  pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
  /// Read-only text, dismissed with Enter.
  Note,
  Select { options: Vec<Choice>, cursor: usize },
  Confirm { affirmative: String, negative: String, value: bool },
  Input {
    value:    String,
    secret:   bool,
    /// Message shown when submitted blank; `None` accepts blank input.
    required: Option<String>,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
  pub key:         &'static str,
  pub title:       String,
  pub description: String,
  pub kind:        Kind,
}

impl Step {
  pub fn note(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self { key: "", title: title.into(), description: description.into(), kind: Kind::Note }
  }

  pub fn select(key: &'static str, title: impl Into<String>, options: Vec<Choice>) -> Self {
    Self {
      key,
      title: title.into(),
      description: String::new(),
      kind: Kind::Select { options, cursor: 0 },
    }
  }

  pub fn confirm(
    key: &'static str,
    title: impl Into<String>,
    description: impl Into<String>,
    affirmative: impl Into<String>,
    negative: impl Into<String>,
  ) -> Self {
    Self {
      key,
      title: title.into(),
      description: description.into(),
      kind: Kind::Confirm {
        affirmative: affirmative.into(),
        negative:    negative.into(),
        value:       true,
      },
    }
  }

  pub fn input(key: &'static str, title: impl Into<String>) -> Self {
    Self {
      key,
      title: title.into(),
      description: String::new(),
      kind: Kind::Input { value: String::new(), secret: false, required: None },
    }
  }

  pub fn describe(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  /// Mask the typed value.
  pub fn secret(mut self) -> Self {
    if let Kind::Input { secret, .. } = &mut self.kind {
      *secret = true;
    }
    self
  }

  /// Reject blank input with `message`.
  pub fn required(mut self, message: impl Into<String>) -> Self {
    if let Kind::Input { required, .. } = &mut self.kind {
      *required = Some(message.into());
    }
    self
  }
}

// ─── Form ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
  Editing,
  Submitted,
  Cancelled,
}

#[derive(Debug, Clone)]
pub struct Form {
  steps:   Vec<Step>,
  current: usize,
  error:   Option<ValidationError>,
  state:   Progress,
}

impl Form {
  pub fn new(steps: Vec<Step>) -> Self {
    let state = if steps.is_empty() { Progress::Submitted } else { Progress::Editing };
    Self { steps, current: 0, error: None, state }
  }

  pub fn progress(&self) -> Progress { self.state }

  pub fn current(&self) -> Option<&Step> { self.steps.get(self.current) }

  pub fn error(&self) -> Option<&ValidationError> { self.error.as_ref() }

  /// One-based index of the active step and the number of steps.
  pub fn position(&self) -> (usize, usize) {
    ((self.current + 1).min(self.steps.len()), self.steps.len())
  }

  pub fn feed(&mut self, key: KeyEvent) -> Progress {
    if self.state != Progress::Editing {
      return self.state;
    }
    if key.code == KeyCode::Esc
      || key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
    {
      self.state = Progress::Cancelled;
      return self.state;
    }

    let Some(step) = self.steps.get_mut(self.current) else {
      return self.state;
    };
    let advance = match &mut step.kind {
      Kind::Note => key.code == KeyCode::Enter,

      Kind::Select { options, cursor } => match key.code {
        KeyCode::Char('q') => {
          self.state = Progress::Cancelled;
          return self.state;
        }
        KeyCode::Up | KeyCode::Char('k') => {
          *cursor = cursor.saturating_sub(1);
          false
        }
        KeyCode::Down | KeyCode::Char('j') => {
          if *cursor + 1 < options.len() {
            *cursor += 1;
          }
          false
        }
        KeyCode::Enter => !options.is_empty(),
        _ => false,
      },

      Kind::Confirm { value, .. } => match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
          *value = true;
          true
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
          *value = false;
          true
        }
        KeyCode::Left
        | KeyCode::Right
        | KeyCode::Tab
        | KeyCode::Char('h')
        | KeyCode::Char('l') => {
          *value = !*value;
          false
        }
        KeyCode::Enter => true,
        _ => false,
      },

      Kind::Input { value, required, .. } => match key.code {
        KeyCode::Char(c) => {
          value.push(c);
          self.error = None;
          false
        }
        KeyCode::Backspace => {
          value.pop();
          false
        }
        KeyCode::Enter => match required {
          Some(message) if value.trim().is_empty() => {
            self.error = Some(ValidationError(message.clone()));
            false
          }
          _ => true,
        },
        _ => false,
      },
    };

    if advance {
      self.error = None;
      self.current += 1;
      if self.current >= self.steps.len() {
        self.state = Progress::Submitted;
      }
    }
    self.state
  }

  // ── Answers ─────────────────────────────────────────────────────────────

  fn step(&self, key: &str) -> Option<&Step> {
    self.steps.iter().find(|s| !s.key.is_empty() && s.key == key)
  }

  /// Trimmed text of an input step.
  pub fn text(&self, key: &str) -> Option<String> {
    match &self.step(key)?.kind {
      Kind::Input { value, .. } => Some(value.trim().to_string()),
      _ => None,
    }
  }

  /// Value of the highlighted option of a select step.
  pub fn choice(&self, key: &str) -> Option<&str> {
    match &self.step(key)?.kind {
      Kind::Select { options, cursor } => options.get(*cursor).map(|c| c.value.as_str()),
      _ => None,
    }
  }

  pub fn confirmed(&self, key: &str) -> Option<bool> {
    match &self.step(key)?.kind {
      Kind::Confirm { value, .. } => Some(*value),
      _ => None,
    }
  }
}
