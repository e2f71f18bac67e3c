//! Shared HTTP plumbing.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::{Error, Result};

pub fn client() -> Result<Client> {
  Ok(
    Client::builder()
      .connect_timeout(Duration::from_secs(10))
      .build()?,
  )
}

/// Pass a successful response through; turn anything else into
/// [`Error::Status`] carrying the response body.
pub async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(Error::Status { status: status.as_u16(), body })
}
