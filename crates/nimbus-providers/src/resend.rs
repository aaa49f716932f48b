//! Resend transactional-email client.

use nimbus_core::provider::{Mailer, MessageId, ProviderError};
use serde::{Deserialize, Serialize};

use crate::http::{bad_payload, status_error, unreachable};

const PROVIDER: &str = "resend";

/// Client for the Resend `/emails` endpoint.
#[derive(Clone)]
pub struct ResendMailer {
  client:   reqwest::Client,
  base_url: String,
  api_key:  String,
  from:     String,
}

impl ResendMailer {
  /// `from` is the full sender spec, e.g. `Nimbus <alerts@example.com>`.
  pub fn new(
    client: reqwest::Client,
    base_url: impl Into<String>,
    api_key: impl Into<String>,
    from: impl Into<String>,
  ) -> Self {
    Self {
      client,
      base_url: base_url.into(),
      api_key: api_key.into(),
      from: from.into(),
    }
  }
}

#[derive(Serialize)]
struct SendRequest<'a> {
  from:    &'a str,
  to:      &'a str,
  subject: &'a str,
  html:    &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
  id: String,
}

impl Mailer for ResendMailer {
  async fn send(
    &self,
    to: &str,
    subject: &str,
    html_body: &str,
  ) -> Result<MessageId, ProviderError> {
    let url = format!("{}/emails", self.base_url.trim_end_matches('/'));

    let resp = self
      .client
      .post(url)
      .bearer_auth(&self.api_key)
      .json(&SendRequest { from: &self.from, to, subject, html: html_body })
      .send()
      .await
      .map_err(unreachable(PROVIDER))?;
    if !resp.status().is_success() {
      return Err(status_error(PROVIDER, resp).await);
    }

    let body: SendResponse = resp.json().await.map_err(bad_payload(PROVIDER))?;
    Ok(MessageId(body.id))
  }
}
