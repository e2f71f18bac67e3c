//! Provider capability traits.
//!
//! A provider implements one trait per capability it offers. Managers depend
//! only on these traits, never on a concrete provider.

use std::future::Future;

use crate::{contact::Contact, message::MessageSnapshot};

// ─── Contacts ────────────────────────────────────────────────────────────────

/// Result of pulling contacts from a provider.
#[derive(Debug, Clone, Default)]
pub struct ContactChanges {
  /// Records created or changed remotely, already normalised.
  pub updated:     Vec<Contact>,
  /// Uids removed remotely since the previous cursor.
  pub deleted:     Vec<String>,
  /// `false` when `updated` is the complete remote set.
  pub incremental: bool,
}

impl ContactChanges {
  pub fn full(contacts: Vec<Contact>) -> Self {
    Self { updated: contacts, deleted: Vec::new(), incremental: false }
  }
}

/// A remote address book.
pub trait ContactSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Short provider name, as stored in settings (e.g. `"google"`).
  fn name(&self) -> &str;

  /// Whether [`fetch_changes`](Self::fetch_changes) can return deltas.
  fn supports_incremental_sync(&self) -> bool { false }

  /// Fetch every remote contact, draining all pages.
  fn fetch_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Fetch what changed since the stored cursor. Providers without cursor
  /// support return the full set.
  fn fetch_changes(
    &self,
  ) -> impl Future<Output = Result<ContactChanges, Self::Error>> + Send + '_ {
    async move { Ok(ContactChanges::full(self.fetch_all().await?)) }
  }

  /// Create or update one contact remotely.
  fn write_one(
    &self,
    contact: &Contact,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Delete one contact remotely by provider uid.
  fn delete_one(
    &self,
    uid: &str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

// ─── Messages ────────────────────────────────────────────────────────────────

/// A remote message archive that only supports full refreshes.
pub trait MessageSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn name(&self) -> &str;

  /// Fetch the current snapshot of every conversation and its messages.
  fn sync(
    &self,
  ) -> impl Future<Output = Result<MessageSnapshot, Self::Error>> + Send + '_;
}
