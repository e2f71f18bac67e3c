//! OAuth2 for Google: stored client credentials, the consent URL, the
//! authorization-code exchange, and refresh-token grants.

use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result, http};

pub const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/auth";
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Out-of-band redirect for desktop clients; the user pastes the code back.
pub const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
pub const SCOPES: [&str; 2] = [
  "https://www.googleapis.com/auth/contacts",
  "https://www.googleapis.com/auth/userinfo.email",
];
const STATE: &str = "state-token";

/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

// ─── Stored credentials ──────────────────────────────────────────────────────

/// Contents of `contacts/google_creds.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleCredentials {
  pub client_id:     String,
  pub client_secret: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub refresh_token: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub access_token:  String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub email:         String,
}

impl GoogleCredentials {
  pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
    Self {
      client_id: client_id.into(),
      client_secret: client_secret.into(),
      ..Self::default()
    }
  }

  pub fn is_authorized(&self) -> bool { !self.refresh_token.is_empty() }
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenResponse {
  access_token:  String,
  #[serde(default)]
  expires_in:    Option<u64>,
  #[serde(default)]
  refresh_token: Option<String>,
}

/// A bearer token with its local expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
  pub token:  String,
  expires_at: Instant,
}

impl AccessToken {
  fn from_response(resp: &TokenResponse) -> Self {
    let ttl = Duration::from_secs(resp.expires_in.unwrap_or(3600));
    Self {
      token:      resp.access_token.clone(),
      expires_at: Instant::now() + ttl.saturating_sub(EXPIRY_MARGIN),
    }
  }

  pub fn is_fresh(&self) -> bool { Instant::now() < self.expires_at }
}

/// The consent page URL: offline access, forced consent, out-of-band redirect.
pub fn auth_url(creds: &GoogleCredentials) -> Result<String> {
  let scope = SCOPES.join(" ");
  let url = Url::parse_with_params(AUTH_ENDPOINT, [
    ("client_id", creds.client_id.as_str()),
    ("redirect_uri", REDIRECT_URI),
    ("response_type", "code"),
    ("scope", scope.as_str()),
    ("state", STATE),
    ("access_type", "offline"),
    ("prompt", "consent"),
  ])
  .map_err(|e| Error::Url(e.to_string()))?;
  Ok(url.into())
}

async fn token_request(client: &Client, form: &[(&str, &str)]) -> Result<TokenResponse> {
  let resp = client.post(TOKEN_ENDPOINT).form(form).send().await?;
  Ok(http::check(resp).await?.json().await?)
}

/// Trade an authorization code for tokens, storing them in `creds`.
pub async fn exchange_code(
  client: &Client,
  creds: &mut GoogleCredentials,
  code: &str,
) -> Result<AccessToken> {
  let resp = token_request(client, &[
    ("grant_type", "authorization_code"),
    ("code", code),
    ("client_id", creds.client_id.as_str()),
    ("client_secret", creds.client_secret.as_str()),
    ("redirect_uri", REDIRECT_URI),
  ])
  .await?;

  creds.access_token = resp.access_token.clone();
  if let Some(refresh) = &resp.refresh_token {
    creds.refresh_token = refresh.clone();
  }
  if !creds.is_authorized() {
    return Err(Error::NotAuthenticated);
  }
  debug!("exchanged authorization code");
  Ok(AccessToken::from_response(&resp))
}

/// Mint a fresh access token from the stored refresh token.
pub async fn refresh(client: &Client, creds: &GoogleCredentials) -> Result<AccessToken> {
  if !creds.is_authorized() {
    return Err(Error::NotAuthenticated);
  }
  let resp = token_request(client, &[
    ("grant_type", "refresh_token"),
    ("refresh_token", creds.refresh_token.as_str()),
    ("client_id", creds.client_id.as_str()),
    ("client_secret", creds.client_secret.as_str()),
  ])
  .await?;
  debug!("refreshed access token");
  Ok(AccessToken::from_response(&resp))
}

/// The account email, used to label stored credentials.
pub async fn user_email(client: &Client, token: &AccessToken) -> Result<String> {
  #[derive(Deserialize)]
  struct UserInfo {
    #[serde(default)]
    email: String,
  }

  let resp = client
    .get(USERINFO_ENDPOINT)
    .bearer_auth(&token.token)
    .send()
    .await?;
  let info: UserInfo = http::check(resp).await?.json().await?;
  Ok(info.email)
}
