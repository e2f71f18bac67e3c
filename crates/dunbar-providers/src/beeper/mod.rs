//! Beeper Desktop API messages provider.
//!
//! Every sync is a full refresh: all chats are listed, then every message of
//! every chat, paging backwards with `direction=before` until the API reports
//! no more pages.

mod mapper;
mod schema;

use dunbar_core::{
  message::{Message, MessageSnapshot},
  paths::DunbarPaths,
  source::MessageSource,
};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use self::schema::{BeeperMessage, Chat, Page};
use crate::{Error, Result, credentials, http};

/// Where the desktop app serves its API by default.
pub const DEFAULT_BASE_URL: &str = "http://localhost:23373";

/// Contents of `beeper_credentials.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeeperCredentials {
  pub access_token: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub base_url:     Option<String>,
}

impl BeeperCredentials {
  pub fn new(access_token: impl Into<String>) -> Self {
    Self { access_token: access_token.into(), base_url: None }
  }

  pub fn base_url(&self) -> &str {
    self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
  }
}

pub fn stored_credentials(paths: &DunbarPaths) -> Result<Option<BeeperCredentials>> {
  credentials::load(&paths.beeper_credentials())
}

pub fn save_credentials(paths: &DunbarPaths, creds: &BeeperCredentials) -> Result<()> {
  credentials::save(&paths.beeper_credentials(), creds)
}

/// Messages from every network bridged into Beeper.
pub struct BeeperMessages {
  http:  Client,
  base:  Url,
  token: String,
}

impl BeeperMessages {
  pub fn new(creds: &BeeperCredentials) -> Result<Self> {
    if creds.access_token.trim().is_empty() {
      return Err(Error::NotAuthenticated);
    }
    let base = Url::parse(creds.base_url()).map_err(|e| Error::Url(e.to_string()))?;
    Ok(Self {
      http: http::client()?,
      base,
      token: creds.access_token.clone(),
    })
  }

  /// Build from stored credentials; [`Error::MissingCredentials`] if none.
  pub fn open(paths: &DunbarPaths) -> Result<Self> {
    let path = paths.beeper_credentials();
    let creds = credentials::load::<BeeperCredentials>(&path)?
      .ok_or(Error::MissingCredentials { path })?;
    Self::new(&creds)
  }

  fn endpoint(&self, segments: &[&str]) -> Result<Url> {
    let mut url = self.base.clone();
    url
      .path_segments_mut()
      .map_err(|()| Error::Url(format!("{} cannot be a base", self.base)))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  async fn get<T: DeserializeOwned>(&self, url: Url, cursor: Option<&str>) -> Result<T> {
    let mut request = self.http.get(url).bearer_auth(&self.token);
    if let Some(cursor) = cursor {
      request = request.query(&[("cursor", cursor), ("direction", "before")]);
    }
    let resp = request.send().await?;
    Ok(http::check(resp).await?.json().await?)
  }

  /// Follow `oldestCursor` until the listing is exhausted.
  async fn drain<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<T>> {
    let url = self.endpoint(segments)?;
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
      let page: Page<T> = self.get(url.clone(), cursor.as_deref()).await?;
      items.extend(page.items);
      match page.oldest_cursor {
        Some(next) if page.has_more && cursor.as_deref() != Some(next.as_str()) => {
          cursor = Some(next);
        }
        _ => break,
      }
    }
    Ok(items)
  }

  /// Check the token against `GET /v1/accounts`.
  pub async fn verify(&self) -> Result<()> {
    let resp = self
      .http
      .get(self.endpoint(&["v1", "accounts"])?)
      .bearer_auth(&self.token)
      .send()
      .await?;
    http::check(resp).await?;
    Ok(())
  }
}

impl MessageSource for BeeperMessages {
  type Error = Error;

  fn name(&self) -> &str { "beeper" }

  async fn sync(&self) -> Result<MessageSnapshot> {
    let chats: Vec<Chat> = self.drain(&["v1", "chats"]).await?;
    info!(chats = chats.len(), "fetched beeper chats");

    let mut snapshot = MessageSnapshot::default();
    let total = chats.len();

    for (n, chat) in chats.into_iter().enumerate() {
      let conversation = mapper::chat_to_conversation(chat);
      let raw: Vec<BeeperMessage> = self
        .drain(&["v1", "chats", conversation.id.as_str(), "messages"])
        .await?;

      let messages: Vec<Message> = raw
        .into_iter()
        .map(|m| mapper::convert_message(m, &conversation))
        .collect();
      info!(
        n = n + 1,
        total,
        title = %conversation.title,
        platform = %conversation.platform,
        messages = messages.len(),
        "synced conversation"
      );

      snapshot.messages.extend(messages);
      snapshot.conversations.push(conversation);
    }

    debug!(
      conversations = snapshot.conversations.len(),
      messages = snapshot.messages.len(),
      "beeper sync finished"
    );
    Ok(snapshot)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn credentials_default_base_url() {
    let creds: BeeperCredentials = serde_json::from_str(r#"{"access_token":"t"}"#).unwrap();
    assert_eq!(creds.base_url(), DEFAULT_BASE_URL);
    assert_eq!(
      serde_json::to_string(&creds).unwrap(),
      r#"{"access_token":"t"}"#
    );
  }

  #[test]
  fn empty_token_is_rejected() {
    assert!(matches!(
      BeeperMessages::new(&BeeperCredentials::new("  ")),
      Err(Error::NotAuthenticated)
    ));
  }

  #[test]
  fn chat_ids_are_escaped_in_paths() {
    let beeper = BeeperMessages::new(&BeeperCredentials::new("t")).unwrap();
    let url = beeper
      .endpoint(&["v1", "chats", "!abc:beeper.local/x", "messages"])
      .unwrap();
    assert_eq!(
      url.as_str(),
      "http://localhost:23373/v1/chats/!abc:beeper.local%2Fx/messages"
    );
  }

  #[test]
  fn open_without_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DunbarPaths::new(dir.path());
    assert!(matches!(
      BeeperMessages::open(&paths),
      Err(Error::MissingCredentials { .. })
    ));

    save_credentials(&paths, &BeeperCredentials::new("token")).unwrap();
    assert!(BeeperMessages::open(&paths).is_ok());
    assert_eq!(
      stored_credentials(&paths).unwrap().unwrap().access_token,
      "token"
    );
  }
}
