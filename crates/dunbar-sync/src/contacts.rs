//! [`ContactManager`], the owner of the contact lifecycle.

use chrono::Utc;
use dunbar_core::{
  contact::{Contact, is_provider_uid},
  source::{ContactChanges, ContactSource},
};
use dunbar_store::ContactFiles;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{Error, Result};

/// Outcome of a [`ContactManager::sync`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactSyncReport {
  pub updated:     usize,
  pub deleted:     usize,
  pub incremental: bool,
}

/// Mediates between the contact files and a remote address book.
///
/// Local writes stamp `last_modified` and push to the provider after the
/// file is written. Deletes of provider-owned contacts go to the provider
/// first and leave the file alone if the provider refuses.
pub struct ContactManager<S> {
  files:  ContactFiles,
  source: S,
}

impl<S: ContactSource> ContactManager<S> {
  pub fn new(files: ContactFiles, source: S) -> Self { Self { files, source } }

  pub async fn get(&self, uid: &str) -> Result<Option<Contact>> {
    Ok(self.files.get(uid).await?)
  }

  /// All local contacts ordered by uid.
  pub async fn list(&self) -> Result<Vec<Contact>> {
    let mut contacts = self.files.list().await?;
    contacts.sort_by(|a, b| a.uid.cmp(&b.uid));
    Ok(contacts)
  }

  /// Persist a local edit, then push it to the provider.
  ///
  /// A [`Error::ProviderWrite`] means the local file is already written.
  pub async fn write(&self, mut contact: Contact) -> Result<Contact> {
    if contact.uid.is_empty() {
      contact.uid = Uuid::new_v4().to_string();
    }
    contact.last_modified = Some(Utc::now());

    self.files.put(&contact).await?;
    self
      .source
      .write_one(&contact)
      .await
      .map_err(|e| Error::ProviderWrite { uid: contact.uid.clone(), source: Box::new(e) })?;

    debug!(uid = %contact.uid, "wrote contact");
    Ok(contact)
  }

  /// [`write`](Self::write) each record in order, stopping at the first
  /// failure. Earlier records stay written.
  pub async fn write_batch(&self, contacts: impl IntoIterator<Item = Contact>) -> Result<usize> {
    let mut written = 0;
    for contact in contacts {
      self.write(contact).await?;
      written += 1;
    }
    Ok(written)
  }

  /// Delete a contact. Provider-owned uids are deleted remotely first.
  pub async fn delete(&self, uid: &str) -> Result<()> {
    if is_provider_uid(uid) {
      self
        .source
        .delete_one(uid)
        .await
        .map_err(|e| Error::ProviderDelete { uid: uid.to_string(), source: Box::new(e) })?;
    }

    match self.files.remove(uid).await {
      Ok(()) => {
        debug!(uid, "deleted contact");
        Ok(())
      }
      Err(dunbar_store::Error::ContactNotFound(uid)) => Err(Error::NotFound(uid)),
      Err(e) => Err(e.into()),
    }
  }

  /// Pull remote contacts into the local files.
  ///
  /// Pulled records get `last_synced = now`; `last_modified` and `tags` are
  /// carried over from any existing local record so a sync never looks like
  /// a local edit.
  pub async fn sync(&self) -> Result<ContactSyncReport> {
    let changes = if self.source.supports_incremental_sync() {
      self.source.fetch_changes().await
    } else {
      self.source.fetch_all().await.map(ContactChanges::full)
    }
    .map_err(|e| Error::ProviderFetch(Box::new(e)))?;

    let now = Utc::now();
    let mut report = ContactSyncReport {
      incremental: changes.incremental,
      ..ContactSyncReport::default()
    };

    for mut contact in changes.updated {
      if contact.uid.is_empty() {
        contact.uid = Uuid::new_v4().to_string();
      }
      if let Some(existing) = self.files.get(&contact.uid).await? {
        contact.last_modified = existing.last_modified;
        contact.tags = existing.tags;
      } else {
        contact.last_modified = None;
      }
      contact.last_synced = Some(now);

      self.files.put(&contact).await?;
      report.updated += 1;
    }

    if changes.incremental {
      for uid in changes.deleted {
        match self.files.remove(&uid).await {
          Ok(()) => report.deleted += 1,
          Err(dunbar_store::Error::ContactNotFound(_)) => {}
          Err(e) => return Err(e.into()),
        }
      }
    }

    info!(
      provider = self.source.name(),
      updated = report.updated,
      deleted = report.deleted,
      incremental = report.incremental,
      "contact sync complete"
    );
    Ok(report)
  }
}
