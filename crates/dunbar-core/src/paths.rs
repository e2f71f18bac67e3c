//! On-disk layout of the dunbar data directory.
//!
//! ```text
//! <root>/
//!   config.json
//!   beeper_credentials.json
//!   messages.db
//!   contacts/
//!     google_creds.json
//!     google_sync_token.txt
//!     people/<uid>.json
//! ```
//!
//! A [`DunbarPaths`] is resolved once at startup and handed to every component
//! that touches storage.

use std::{
  fs, io,
  io::Write as _,
  os::unix::fs::{OpenOptionsExt as _, PermissionsExt as _},
  path::{Path, PathBuf},
};

/// Mode for credential and cursor files.
pub const PRIVATE_MODE: u32 = 0o600;
/// Mode for contact records and settings.
pub const PUBLIC_MODE: u32 = 0o644;

const DEFAULT_DIR_NAME: &str = "dunbar";
const FALLBACK_DIR: &str = ".dunbar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DunbarPaths {
  root: PathBuf,
}

impl DunbarPaths {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  /// `~/.config/dunbar`, or `.dunbar` when no home directory is known.
  pub fn default_root() -> PathBuf {
    dirs::home_dir()
      .map(|home| home.join(".config").join(DEFAULT_DIR_NAME))
      .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
  }

  pub fn root(&self) -> &Path { &self.root }

  pub fn settings_file(&self) -> PathBuf { self.root.join("config.json") }

  pub fn messages_db(&self) -> PathBuf { self.root.join("messages.db") }

  pub fn beeper_credentials(&self) -> PathBuf {
    self.root.join("beeper_credentials.json")
  }

  pub fn contacts_dir(&self) -> PathBuf { self.root.join("contacts") }

  pub fn people_dir(&self) -> PathBuf { self.contacts_dir().join("people") }

  pub fn google_credentials(&self) -> PathBuf {
    self.contacts_dir().join("google_creds.json")
  }

  pub fn google_sync_token(&self) -> PathBuf {
    self.contacts_dir().join("google_sync_token.txt")
  }

  /// Create the root, contacts, and people directories if missing.
  pub fn ensure_dirs(&self) -> io::Result<()> {
    fs::create_dir_all(self.people_dir())
  }
}

/// Write `contents` to `path`, creating parent directories, and leave the file
/// with exactly `mode` permissions even if it already existed.
pub fn write_file(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  let mut file = fs::OpenOptions::new()
    .write(true)
    .create(true)
    .truncate(true)
    .mode(mode)
    .open(path)?;
  file.write_all(contents)?;
  fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn layout() {
    let paths = DunbarPaths::new("/data");
    assert_eq!(paths.people_dir(), PathBuf::from("/data/contacts/people"));
    assert_eq!(
      paths.google_sync_token(),
      PathBuf::from("/data/contacts/google_sync_token.txt")
    );
    assert_eq!(paths.messages_db(), PathBuf::from("/data/messages.db"));
    assert_eq!(paths.settings_file(), PathBuf::from("/data/config.json"));
  }

  #[test]
  fn write_file_applies_mode_to_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("creds.json");

    write_file(&path, b"first", PUBLIC_MODE).unwrap();
    write_file(&path, b"second", PRIVATE_MODE).unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"second");
    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, PRIVATE_MODE);
  }

  #[test]
  fn ensure_dirs_creates_people_dir() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DunbarPaths::new(dir.path().join("root"));
    paths.ensure_dirs().unwrap();
    assert!(paths.people_dir().is_dir());
  }
}
