//! [`ContactFiles`], the one-file-per-contact store.

use std::{
  fs::Permissions,
  io::ErrorKind,
  os::unix::fs::PermissionsExt as _,
  path::{Path, PathBuf},
};

use dunbar_core::{
  contact::Contact,
  paths::{DunbarPaths, PUBLIC_MODE},
};
use tracing::debug;

use crate::{Error, Result};

/// Contacts stored as `<dir>/<uid>.json`.
///
/// The store does not stamp timestamps or assign uids; that is the contact
/// manager's job. It only maps records to files and back.
#[derive(Debug, Clone)]
pub struct ContactFiles {
  dir: PathBuf,
}

impl ContactFiles {
  pub fn new(paths: &DunbarPaths) -> Self { Self::in_dir(paths.people_dir()) }

  /// A store rooted at an arbitrary directory.
  pub fn in_dir(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }

  fn path_for(&self, uid: &str) -> Result<PathBuf> {
    if uid.is_empty() || uid.contains(['/', '\\']) || uid.starts_with('.') {
      return Err(Error::InvalidUid(uid.to_string()));
    }
    Ok(self.dir.join(format!("{uid}.json")))
  }

  /// Read one contact. A missing file is `Ok(None)`.
  pub async fn get(&self, uid: &str) -> Result<Option<Contact>> {
    let path = self.path_for(uid)?;
    match tokio::fs::read(&path).await {
      Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  /// Every stored contact, in directory order.
  pub async fn list(&self) -> Result<Vec<Contact>> {
    let mut entries = match tokio::fs::read_dir(&self.dir).await {
      Ok(entries) => entries,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(e.into()),
    };

    let mut contacts = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
      let path = entry.path();
      if path.extension().is_none_or(|ext| ext != "json") {
        continue;
      }
      let bytes = tokio::fs::read(&path).await?;
      contacts.push(serde_json::from_slice(&bytes)?);
    }
    Ok(contacts)
  }

  /// Write `contact` as pretty JSON, replacing any existing file.
  pub async fn put(&self, contact: &Contact) -> Result<()> {
    let path = self.path_for(&contact.uid)?;
    let json = serde_json::to_vec_pretty(contact)?;

    tokio::fs::create_dir_all(&self.dir).await?;
    tokio::fs::write(&path, json).await?;
    tokio::fs::set_permissions(&path, Permissions::from_mode(PUBLIC_MODE)).await?;

    debug!(uid = %contact.uid, "wrote contact file");
    Ok(())
  }

  /// Remove a contact's file; [`Error::ContactNotFound`] if there is none.
  pub async fn remove(&self, uid: &str) -> Result<()> {
    let path = self.path_for(uid)?;
    match tokio::fs::remove_file(&path).await {
      Ok(()) => {
        debug!(uid, "removed contact file");
        Ok(())
      }
      Err(e) if e.kind() == ErrorKind::NotFound => {
        Err(Error::ContactNotFound(uid.to_string()))
      }
      Err(e) => Err(e.into()),
    }
  }
}
