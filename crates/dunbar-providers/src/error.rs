//! Error type for `dunbar-providers`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The remote answered with a non-success status.
  #[error("request failed with status {status}: {body}")]
  Status { status: u16, body: String },

  #[error("not authenticated; re-run init to authorize")]
  NotAuthenticated,

  #[error("no credentials found at {}", path.display())]
  MissingCredentials { path: PathBuf },

  /// The stored incremental sync cursor is no longer accepted.
  #[error("sync token expired")]
  SyncTokenExpired,

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("invalid url: {0}")]
  Url(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
