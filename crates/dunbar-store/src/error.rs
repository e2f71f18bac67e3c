//! Error type for `dunbar-store`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] dunbar_core::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to remove a contact that has no file on disk.
  #[error("contact not found: {0}")]
  ContactNotFound(String),

  /// A uid that cannot be used as a file name.
  #[error("invalid contact uid: {0:?}")]
  InvalidUid(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
