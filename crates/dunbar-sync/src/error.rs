//! Error type for `dunbar-sync`.

use thiserror::Error;

/// A provider error with its concrete type erased.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// The requested record does not exist locally.
  #[error("not found: {0}")]
  NotFound(String),

  #[error("local store error: {0}")]
  Persist(#[from] dunbar_store::Error),

  #[error("failed to fetch from provider: {0}")]
  ProviderFetch(#[source] BoxError),

  /// The local write committed but the provider push failed.
  #[error("failed to write contact {uid} to provider: {source}")]
  ProviderWrite { uid: String, source: BoxError },

  /// The provider refused the delete; local state was left untouched.
  #[error("failed to delete contact {uid} from provider: {source}")]
  ProviderDelete { uid: String, source: BoxError },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
