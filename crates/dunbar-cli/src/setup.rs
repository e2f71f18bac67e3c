//! `dunbar contacts init` and `dunbar messages init`.
//!
//! Every prompt runs to completion before anything is written, so cancelling
//! at any step leaves the data directory as it was.

use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use dunbar_core::paths::DunbarPaths;
use dunbar_providers::{
  beeper::{self, BeeperCredentials, BeeperMessages},
  google::{self, GoogleCredentials, oauth},
};
use tracing::debug;

use crate::{
  prompt::{Choice, Form, Step},
  settings::{ContactsProvider, MessagesProvider, ProviderSettings},
  tui,
};

const CANCELLED: &str = "initialization cancelled";

async fn ask(form: Form) -> Result<Form> {
  match tui::run_form(form).await? {
    Some(form) => Ok(form),
    None => bail!(CANCELLED),
  }
}

fn provider_form<'a>(title: &str, options: impl IntoIterator<Item = (&'a str, &'a str)>) -> Form {
  let options = options
    .into_iter()
    .map(|(value, label)| Choice { value: value.into(), label: label.into() })
    .collect();
  Form::new(vec![Step::select("provider", title, options)])
}

/// Best effort; the URL is also printed and shown in the prompt.
fn open_browser(url: &str) {
  let program = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
  let spawned = Command::new(program)
    .arg(url)
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn();
  if let Err(e) = spawned {
    debug!(program, error = %e, "could not open browser");
  }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

pub async fn contacts_init(paths: &DunbarPaths) -> Result<()> {
  let form = ask(provider_form(
    "Select a contacts provider",
    ContactsProvider::ALL.iter().map(|p| (p.as_str(), p.label())),
  ))
  .await?;
  let provider: ContactsProvider = form.choice("provider").unwrap_or_default().parse()?;

  match provider {
    ContactsProvider::Google => google_init(paths).await?,
  }

  ProviderSettings::update(paths, |s| s.provider = Some(provider.as_str().into()))
    .context("failed to save provider selection")?;
  Ok(())
}

fn google_replace_form(existing: &GoogleCredentials) -> Form {
  Form::new(vec![Step::confirm(
    "replace",
    "Existing credentials found",
    format!("Client ID: {}\n\nDelete and enter new credentials?", existing.client_id),
    "Yes, delete",
    "No, keep and re-authorize",
  )])
}

fn google_credentials_form() -> Form {
  Form::new(vec![
    Step::note(
      "Google Contacts Setup",
      "To use Google Contacts, you need OAuth 2.0 credentials.\n\n\
       Setup steps:\n\
       1. Enable People API at: console.cloud.google.com/apis/library/people.googleapis.com\n\
       2. Go to: console.cloud.google.com/apis/credentials\n\
       3. Create OAuth 2.0 Client ID (Application type: Desktop app)\n\
       4. No redirect URIs needed (auto-includes urn:ietf:wg:oauth:2.0:oob)",
    ),
    Step::input("client_id", "Client ID").required("client ID cannot be empty"),
    Step::input("client_secret", "Client Secret")
      .secret()
      .required("client secret cannot be empty"),
  ])
}

fn auth_code_form(auth_url: &str) -> Form {
  Form::new(vec![
    Step::input("code", "Authorization Code")
      .describe(format!(
        "Open this URL, approve access, and paste the code Google shows you:\n\n{auth_url}"
      ))
      .required("authorization code cannot be empty"),
  ])
}

async fn google_init(paths: &DunbarPaths) -> Result<()> {
  let existing = google::stored_credentials(paths)
    .context("failed to read Google credentials")?
    .filter(|c| !c.client_id.is_empty());

  let keep = match &existing {
    Some(creds) => {
      let form = ask(google_replace_form(creds)).await?;
      form.confirmed("replace") == Some(false)
    }
    None => false,
  };

  let creds = match existing {
    Some(creds) if keep => creds,
    _ => {
      let form = ask(google_credentials_form()).await?;
      GoogleCredentials::new(
        form.text("client_id").unwrap_or_default(),
        form.text("client_secret").unwrap_or_default(),
      )
    }
  };

  let auth_url = oauth::auth_url(&creds)?;
  open_browser(&auth_url);
  println!("\nOpening your browser for authorization...");
  println!("If the browser doesn't open, copy this URL manually:\n");
  println!("{auth_url}\n");

  let form = ask(auth_code_form(&auth_url)).await?;
  let code = form.text("code").unwrap_or_default();

  let creds = google::authorize(paths, creds, &code)
    .await
    .context("failed to exchange auth code")?;

  if keep {
    println!("\nGoogle Contacts provider re-authorized successfully!");
  } else {
    println!("\nGoogle Contacts provider initialized successfully!");
  }
  if !creds.email.is_empty() {
    println!("Signed in as {}", creds.email);
  }
  println!("Run 'dunbar contacts sync' to sync your contacts.");
  Ok(())
}

// ─── Messages ────────────────────────────────────────────────────────────────

pub async fn messages_init(paths: &DunbarPaths) -> Result<()> {
  let form = ask(provider_form(
    "Select a messages provider",
    MessagesProvider::ALL.iter().map(|p| (p.as_str(), p.label())),
  ))
  .await?;
  let provider: MessagesProvider = form.choice("provider").unwrap_or_default().parse()?;

  match provider {
    MessagesProvider::Beeper => beeper_init(paths).await?,
  }

  ProviderSettings::update(paths, |s| s.messages_provider = Some(provider.as_str().into()))
    .context("failed to save provider selection")?;
  Ok(())
}

fn beeper_replace_form() -> Form {
  Form::new(vec![Step::confirm(
    "replace",
    "Existing credentials found",
    "Delete and enter new access token?",
    "Yes, delete",
    "No, keep existing",
  )])
}

fn beeper_token_form() -> Form {
  Form::new(vec![
    Step::note(
      "Beeper Setup",
      "To use Beeper, you need an access token.\n\n\
       Setup steps:\n\
       1. Open Beeper Desktop\n\
       2. Go to Settings > Developer\n\
       3. Copy your Access Token",
    ),
    Step::input("token", "Access Token")
      .secret()
      .required("access token cannot be empty"),
  ])
}

/// New credentials from a completed token form, keeping any custom base URL.
fn beeper_credentials(form: &Form, existing: Option<&BeeperCredentials>) -> BeeperCredentials {
  BeeperCredentials {
    access_token: form.text("token").unwrap_or_default(),
    base_url:     existing.and_then(|c| c.base_url.clone()),
  }
}

async fn beeper_init(paths: &DunbarPaths) -> Result<()> {
  let existing = beeper::stored_credentials(paths)
    .context("failed to read Beeper credentials")?
    .filter(|c| !c.access_token.is_empty());

  if existing.is_some() {
    let form = ask(beeper_replace_form()).await?;
    if form.confirmed("replace") == Some(false) {
      println!("Keeping existing credentials.");
      println!("Run 'dunbar messages sync' to sync your messages.");
      return Ok(());
    }
  }

  let form = ask(beeper_token_form()).await?;
  let creds = beeper_credentials(&form, existing.as_ref());

  println!("\nTesting connection to Beeper...");
  BeeperMessages::new(&creds)?
    .verify()
    .await
    .context("failed to connect to Beeper")?;

  beeper::save_credentials(paths, &creds).context("failed to save credentials")?;

  println!("✓ Beeper provider initialized successfully!");
  println!("Run 'dunbar messages sync' to sync your messages.");
  Ok(())
}

#[cfg(test)]
mod tests {
  use crossterm::event::{KeyCode, KeyEvent};

  use super::*;
  use crate::prompt::Progress;

  fn feed(form: &mut Form, keys: impl IntoIterator<Item = KeyCode>) -> Progress {
    let mut progress = form.progress();
    for code in keys {
      progress = form.feed(KeyEvent::from(code));
    }
    progress
  }

  fn typed(text: &str) -> impl Iterator<Item = KeyCode> + '_ { text.chars().map(KeyCode::Char) }

  #[test]
  fn beeper_token_is_trimmed_and_base_url_kept() {
    let mut form = beeper_token_form();
    let keys = std::iter::once(KeyCode::Enter)
      .chain(typed("  tok  "))
      .chain(std::iter::once(KeyCode::Enter));
    assert_eq!(feed(&mut form, keys), Progress::Submitted);

    let existing = BeeperCredentials {
      access_token: "old".into(),
      base_url:     Some("http://127.0.0.1:9999".into()),
    };
    let creds = beeper_credentials(&form, Some(&existing));
    assert_eq!(creds.access_token, "tok");
    assert_eq!(creds.base_url.as_deref(), Some("http://127.0.0.1:9999"));
  }

  #[test]
  fn empty_beeper_token_is_rejected() {
    let mut form = beeper_token_form();
    assert_eq!(feed(&mut form, [KeyCode::Enter, KeyCode::Enter]), Progress::Editing);
    assert_eq!(
      form.error().map(ToString::to_string).as_deref(),
      Some("access token cannot be empty")
    );
  }

  #[test]
  fn google_replace_defaults_to_delete() {
    let existing = GoogleCredentials::new("client-1", "secret");
    let mut form = google_replace_form(&existing);
    assert!(form.current().unwrap().description.starts_with("Client ID: client-1"));
    assert_eq!(feed(&mut form, [KeyCode::Enter]), Progress::Submitted);
    assert_eq!(form.confirmed("replace"), Some(true));
  }

  #[test]
  fn auth_code_prompt_shows_url() {
    let form = auth_code_form("https://example.test/auth");
    assert!(form.current().unwrap().description.ends_with("https://example.test/auth"));
  }

  #[test]
  fn provider_choices_carry_values() {
    let form = provider_form(
      "Select a messages provider",
      MessagesProvider::ALL.iter().map(|p| (p.as_str(), p.label())),
    );
    assert_eq!(form.choice("provider"), Some("beeper"));
  }
}
