//! Error types for `dunbar-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown conversation type: {0:?}")]
  UnknownConversationKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
