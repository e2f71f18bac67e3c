//! Startup configuration: the data directory and the selected providers.
//!
//! The data directory comes from `DUNBAR_DIR` (read through the `config`
//! crate's environment source) and falls back to `~/.config/dunbar`. Provider
//! selection lives in `config.json` inside that directory.

use std::{path::PathBuf, str::FromStr};

use dunbar_core::paths::{DunbarPaths, PUBLIC_MODE, write_file};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ENV_PREFIX: &str = "DUNBAR";

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("contacts not initialized. Run 'dunbar contacts init' first")]
  ContactsNotInitialized,

  #[error("unsupported provider: {0}")]
  UnsupportedProvider(String),

  #[error("failed to read settings: {0}")]
  Read(#[from] config::ConfigError),

  #[error("failed to write settings: {0}")]
  Write(#[from] std::io::Error),

  #[error("failed to encode settings: {0}")]
  Encode(#[from] serde_json::Error),
}

// ─── Data directory ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct EnvSettings {
  #[serde(default)]
  dir: Option<PathBuf>,
}

/// Resolve the data directory from the process environment.
pub fn resolve_paths() -> Result<DunbarPaths, ConfigError> {
  paths_from(config::Environment::with_prefix(ENV_PREFIX))
}

fn paths_from(env: config::Environment) -> Result<DunbarPaths, ConfigError> {
  let settings: EnvSettings = config::Config::builder()
    .add_source(env)
    .build()?
    .try_deserialize()?;

  let root = settings
    .dir
    .filter(|dir| !dir.as_os_str().is_empty())
    .unwrap_or_else(DunbarPaths::default_root);
  Ok(DunbarPaths::new(root))
}

// ─── Providers ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactsProvider {
  Google,
}

impl ContactsProvider {
  pub const ALL: [Self; 1] = [Self::Google];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Google => "google",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Google => "Google Contacts (People API)",
    }
  }
}

impl FromStr for ContactsProvider {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "google" => Ok(Self::Google),
      other => Err(ConfigError::UnsupportedProvider(other.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagesProvider {
  Beeper,
}

impl MessagesProvider {
  pub const ALL: [Self; 1] = [Self::Beeper];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Beeper => "beeper",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Beeper => "Beeper (Multi-platform messaging)",
    }
  }
}

impl FromStr for MessagesProvider {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "beeper" => Ok(Self::Beeper),
      other => Err(ConfigError::UnsupportedProvider(other.to_string())),
    }
  }
}

// ─── config.json ─────────────────────────────────────────────────────────────

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub provider:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub messages_provider: Option<String>,
}

impl ProviderSettings {
  /// Read `config.json`; a missing file yields empty settings.
  pub fn load(paths: &DunbarPaths) -> Result<Self, ConfigError> {
    let settings = config::Config::builder()
      .add_source(
        config::File::from(paths.settings_file())
          .format(config::FileFormat::Json)
          .required(false),
      )
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  pub fn save(&self, paths: &DunbarPaths) -> Result<(), ConfigError> {
    let json = serde_json::to_vec_pretty(self)?;
    write_file(&paths.settings_file(), &json, PUBLIC_MODE)?;
    Ok(())
  }

  /// Re-read the file, apply `edit`, and write it back so that one `init`
  /// never drops the other's key.
  pub fn update(
    paths: &DunbarPaths,
    edit: impl FnOnce(&mut Self),
  ) -> Result<Self, ConfigError> {
    let mut settings = Self::load(paths)?;
    edit(&mut settings);
    settings.save(paths)?;
    Ok(settings)
  }

  pub fn contacts_provider(&self) -> Result<ContactsProvider, ConfigError> {
    match self.provider.as_deref() {
      None | Some("") => Err(ConfigError::ContactsNotInitialized),
      Some(name) => name.parse(),
    }
  }

  /// Beeper is assumed when no messages provider was ever recorded.
  pub fn messages_provider(&self) -> Result<MessagesProvider, ConfigError> {
    match self.messages_provider.as_deref() {
      None | Some("") => Ok(MessagesProvider::Beeper),
      Some(name) => name.parse(),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn env(vars: &[(&str, &str)]) -> config::Environment {
    let map: HashMap<String, String> = vars
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
  }

  #[test]
  fn dunbar_dir_overrides_default() {
    let paths = paths_from(env(&[("DUNBAR_DIR", "/tmp/dunbar-test")])).unwrap();
    assert_eq!(paths.root(), std::path::Path::new("/tmp/dunbar-test"));
  }

  #[test]
  fn empty_dunbar_dir_uses_default() {
    let paths = paths_from(env(&[("DUNBAR_DIR", "")])).unwrap();
    assert_eq!(paths.root(), DunbarPaths::default_root());

    let paths = paths_from(env(&[])).unwrap();
    assert_eq!(paths.root(), DunbarPaths::default_root());
  }

  #[test]
  fn missing_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DunbarPaths::new(dir.path());
    let settings = ProviderSettings::load(&paths).unwrap();
    assert_eq!(settings, ProviderSettings::default());
    assert!(matches!(
      settings.contacts_provider(),
      Err(ConfigError::ContactsNotInitialized)
    ));
    assert_eq!(settings.messages_provider().unwrap(), MessagesProvider::Beeper);
  }

  #[test]
  fn update_keeps_other_key() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DunbarPaths::new(dir.path());

    ProviderSettings::update(&paths, |s| s.provider = Some("google".into())).unwrap();
    ProviderSettings::update(&paths, |s| s.messages_provider = Some("beeper".into()))
      .unwrap();

    let settings = ProviderSettings::load(&paths).unwrap();
    assert_eq!(settings.contacts_provider().unwrap(), ContactsProvider::Google);
    assert_eq!(settings.messages_provider().unwrap(), MessagesProvider::Beeper);
  }

  #[test]
  fn reads_plain_provider_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DunbarPaths::new(dir.path());
    std::fs::write(paths.settings_file(), "{\n  \"provider\": \"carddav\"\n}").unwrap();

    let settings = ProviderSettings::load(&paths).unwrap();
    assert!(matches!(
      settings.contacts_provider(),
      Err(ConfigError::UnsupportedProvider(name)) if name == "carddav"
    ));
  }
}
