//! Reading and writing credential files.
//!
//! Credentials are pretty-printed JSON, always left with owner-only
//! permissions. A missing file loads as `None`.

use std::{io::ErrorKind, path::Path};

use dunbar_core::paths::{PRIVATE_MODE, write_file};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::Result;

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
  let bytes = match std::fs::read(path) {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(e.into()),
  };
  debug!(path = %path.display(), "loaded credentials");
  Ok(Some(serde_json::from_slice(&bytes)?))
}

pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  let json = serde_json::to_vec_pretty(value)?;
  write_file(path, &json, PRIVATE_MODE)?;
  debug!(path = %path.display(), "saved credentials");
  Ok(())
}
