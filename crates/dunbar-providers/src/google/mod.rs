//! Google People API contacts provider.
//!
//! Listing uses `people/me/connections` with a sync token so later pulls only
//! return changes. The token is persisted to `google_sync_token.txt` after a
//! listing has drained every page, never mid-listing.

mod mapper;
pub mod oauth;
mod schema;

use std::path::PathBuf;

use dunbar_core::{
  contact::Contact,
  paths::{DunbarPaths, PRIVATE_MODE, write_file},
  source::{ContactChanges, ContactSource},
};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub use self::{
  mapper::{person_to_contact, uid_from_resource_name},
  oauth::GoogleCredentials,
};
use self::{oauth::AccessToken, schema::ConnectionsPage};
use crate::{Error, Result, credentials, http};

pub const API_BASE: &str = "https://people.googleapis.com/v1";

const PERSON_FIELDS: &str =
  "names,emailAddresses,phoneNumbers,addresses,organizations,birthdays,photos,biographies";
const UPDATE_PERSON_FIELDS: &str =
  "names,phoneNumbers,emailAddresses,addresses,organizations,birthdays,biographies";
const PAGE_SIZE: &str = "1000";

/// Google Contacts through the People API.
pub struct GoogleContacts {
  http:            Client,
  api_base:        String,
  creds:           GoogleCredentials,
  sync_token_path: PathBuf,
  token:           Mutex<Option<AccessToken>>,
}

impl GoogleContacts {
  /// Load stored credentials. Fails with [`Error::MissingCredentials`] when
  /// `init` has never run and [`Error::NotAuthenticated`] when it never
  /// completed authorization.
  pub fn open(paths: &DunbarPaths) -> Result<Self> {
    let creds_path = paths.google_credentials();
    let creds: GoogleCredentials = credentials::load(&creds_path)?
      .ok_or(Error::MissingCredentials { path: creds_path })?;
    if !creds.is_authorized() {
      return Err(Error::NotAuthenticated);
    }

    Ok(Self {
      http: http::client()?,
      api_base: API_BASE.to_string(),
      creds,
      sync_token_path: paths.google_sync_token(),
      token: Mutex::new(None),
    })
  }

  /// Point requests at a different People API root.
  pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
    self.api_base = base.into();
    self
  }

  pub fn email(&self) -> &str { &self.creds.email }

  async fn access_token(&self) -> Result<String> {
    let mut guard = self.token.lock().await;
    if let Some(token) = guard.as_ref().filter(|t| t.is_fresh()) {
      return Ok(token.token.clone());
    }
    let fresh = oauth::refresh(&self.http, &self.creds).await?;
    let token = fresh.token.clone();
    *guard = Some(fresh);
    Ok(token)
  }

  // ── Sync cursor ───────────────────────────────────────────────────────────

  fn read_sync_token(&self) -> Result<Option<String>> {
    match std::fs::read_to_string(&self.sync_token_path) {
      Ok(s) if s.trim().is_empty() => Ok(None),
      Ok(s) => Ok(Some(s.trim().to_string())),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  fn write_sync_token(&self, token: &str) -> Result<()> {
    write_file(&self.sync_token_path, token.as_bytes(), PRIVATE_MODE)?;
    debug!("saved sync token");
    Ok(())
  }

  fn clear_sync_token(&self) -> Result<()> {
    match std::fs::remove_file(&self.sync_token_path) {
      Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
      _ => Ok(()),
    }
  }

  // ── Listing ───────────────────────────────────────────────────────────────

  async fn list_page(
    &self,
    page_token: Option<&str>,
    sync_token: Option<&str>,
  ) -> Result<ConnectionsPage> {
    let token = self.access_token().await?;

    let mut query = vec![
      ("personFields", PERSON_FIELDS),
      ("pageSize", PAGE_SIZE),
      ("sources", "READ_SOURCE_TYPE_CONTACT"),
      ("requestSyncToken", "true"),
    ];
    if let Some(p) = page_token {
      query.push(("pageToken", p));
    }
    if let Some(s) = sync_token {
      query.push(("syncToken", s));
    }

    let resp = self
      .http
      .get(format!("{}/people/me/connections", self.api_base))
      .bearer_auth(token)
      .query(&query)
      .send()
      .await?;

    match http::check(resp).await {
      Ok(resp) => Ok(resp.json().await?),
      Err(Error::Status { status, body })
        if sync_token.is_some() && is_expired_cursor(status, &body) =>
      {
        Err(Error::SyncTokenExpired)
      }
      Err(e) => Err(e),
    }
  }

  /// Drain every page, then persist the new cursor.
  async fn pull(&self, sync_token: Option<&str>) -> Result<ContactChanges> {
    let mut changes = ContactChanges {
      incremental: sync_token.is_some(),
      ..ContactChanges::default()
    };
    let mut page_token: Option<String> = None;
    let mut next_sync_token = None;
    let mut pages = 0usize;

    loop {
      let page = self.list_page(page_token.as_deref(), sync_token).await?;
      pages += 1;
      mapper::apply_page(&mut changes, page.connections);
      if page.next_sync_token.is_some() {
        next_sync_token = page.next_sync_token;
      }
      match page.next_page_token.filter(|t| !t.is_empty()) {
        Some(next) => page_token = Some(next),
        None => break,
      }
    }

    info!(
      pages,
      updated = changes.updated.len(),
      deleted = changes.deleted.len(),
      incremental = changes.incremental,
      "fetched google contacts"
    );

    if let Some(token) = next_sync_token {
      self.write_sync_token(&token)?;
    }
    Ok(changes)
  }
}

/// Google reports a stale cursor either as 410 Gone or as a failed
/// precondition naming `EXPIRED_SYNC_TOKEN`.
fn is_expired_cursor(status: u16, body: &str) -> bool {
  status == 410 || (status == 400 && body.contains("EXPIRED_SYNC_TOKEN"))
}

impl ContactSource for GoogleContacts {
  type Error = Error;

  fn name(&self) -> &str { "google" }

  fn supports_incremental_sync(&self) -> bool { true }

  async fn fetch_all(&self) -> Result<Vec<Contact>> {
    Ok(self.pull(None).await?.updated)
  }

  async fn fetch_changes(&self) -> Result<ContactChanges> {
    let Some(cursor) = self.read_sync_token()? else {
      return self.pull(None).await;
    };

    match self.pull(Some(&cursor)).await {
      Err(Error::SyncTokenExpired) => {
        warn!("google sync token expired; falling back to a full fetch");
        self.clear_sync_token()?;
        self.pull(None).await
      }
      other => other,
    }
  }

  async fn write_one(&self, contact: &Contact) -> Result<()> {
    let token = self.access_token().await?;
    let body = mapper::contact_to_person(contact);

    let request = if contact.is_provider_contact() {
      self
        .http
        .patch(format!(
          "{}/{}:updateContact",
          self.api_base,
          mapper::resource_name_for(&contact.uid)
        ))
        .query(&[("updatePersonFields", UPDATE_PERSON_FIELDS)])
    } else {
      self
        .http
        .post(format!("{}/people:createContact", self.api_base))
    };

    let resp = request.bearer_auth(token).json(&body).send().await?;
    http::check(resp).await?;
    debug!(uid = %contact.uid, "pushed contact to google");
    Ok(())
  }

  async fn delete_one(&self, uid: &str) -> Result<()> {
    let token = self.access_token().await?;
    let resp = self
      .http
      .delete(format!(
        "{}/{}:deleteContact",
        self.api_base,
        mapper::resource_name_for(uid)
      ))
      .bearer_auth(token)
      .send()
      .await?;
    http::check(resp).await?;
    debug!(uid, "deleted contact from google");
    Ok(())
  }
}

// ─── Setup ───────────────────────────────────────────────────────────────────

/// Load whatever credentials `init` previously stored, authorized or not.
pub fn stored_credentials(paths: &DunbarPaths) -> Result<Option<GoogleCredentials>> {
  credentials::load(&paths.google_credentials())
}

/// Persist client credentials (and any tokens) with owner-only permissions.
pub fn save_credentials(paths: &DunbarPaths, creds: &GoogleCredentials) -> Result<()> {
  credentials::save(&paths.google_credentials(), creds)
}

/// Complete authorization: exchange the pasted code, record the account
/// email when it can be read, and save everything. A fresh authorization also
/// discards any previous sync cursor.
pub async fn authorize(
  paths: &DunbarPaths,
  mut creds: GoogleCredentials,
  code: &str,
) -> Result<GoogleCredentials> {
  let client = http::client()?;
  let token = oauth::exchange_code(&client, &mut creds, code).await?;
  match oauth::user_email(&client, &token).await {
    Ok(email) => creds.email = email,
    Err(e) => warn!(error = %e, "could not read account email"),
  }
  save_credentials(paths, &creds)?;

  match std::fs::remove_file(paths.google_sync_token()) {
    Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
    _ => Ok(creds),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expired_cursor_detection() {
    assert!(is_expired_cursor(410, ""));
    assert!(is_expired_cursor(400, r#"{"error":{"details":[{"reason":"EXPIRED_SYNC_TOKEN"}]}}"#));
    assert!(!is_expired_cursor(400, "bad request"));
    assert!(!is_expired_cursor(500, "EXPIRED_SYNC_TOKEN"));
  }

  #[test]
  fn open_requires_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DunbarPaths::new(dir.path());
    assert!(matches!(
      GoogleContacts::open(&paths),
      Err(Error::MissingCredentials { .. })
    ));

    save_credentials(&paths, &GoogleCredentials::new("id", "secret")).unwrap();
    assert!(matches!(GoogleContacts::open(&paths), Err(Error::NotAuthenticated)));
  }

  #[test]
  fn sync_token_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DunbarPaths::new(dir.path());
    let creds = GoogleCredentials {
      refresh_token: "refresh".into(),
      ..GoogleCredentials::new("id", "secret")
    };
    save_credentials(&paths, &creds).unwrap();

    let google = GoogleContacts::open(&paths).unwrap();
    assert_eq!(google.read_sync_token().unwrap(), None);
    google.write_sync_token("cursor-1").unwrap();
    assert_eq!(google.read_sync_token().unwrap().as_deref(), Some("cursor-1"));
    google.clear_sync_token().unwrap();
    google.clear_sync_token().unwrap();
    assert_eq!(google.read_sync_token().unwrap(), None);
  }

  #[test]
  fn saved_credentials_are_private() {
    use std::os::unix::fs::PermissionsExt as _;

    let dir = tempfile::tempdir().unwrap();
    let paths = DunbarPaths::new(dir.path());
    save_credentials(&paths, &GoogleCredentials::new("id", "secret")).unwrap();

    let mode = std::fs::metadata(paths.google_credentials())
      .unwrap()
      .permissions()
      .mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(
      stored_credentials(&paths).unwrap(),
      Some(GoogleCredentials::new("id", "secret"))
    );
  }
}
