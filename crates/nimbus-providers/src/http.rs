//! Shared plumbing for the provider clients.

use std::time::Duration;

use nimbus_core::provider::ProviderError;

/// Upstream calls get one attempt with a short deadline; a slow provider is
/// treated the same as a down one.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the [`reqwest::Client`] shared by all provider clients.
pub fn default_client() -> Result<reqwest::Client, ProviderError> {
  reqwest::Client::builder()
    .timeout(REQUEST_TIMEOUT)
    .build()
    .map_err(|e| ProviderError::Unreachable {
      provider: "http",
      message:  e.to_string(),
    })
}

/// Map a transport-level failure. `reqwest::Error` display strings do not
/// include request bodies or headers, so this cannot leak credentials.
pub fn unreachable(
  provider: &'static str,
) -> impl FnOnce(reqwest::Error) -> ProviderError {
  move |e| ProviderError::Unreachable { provider, message: e.to_string() }
}

/// Map a decode failure on a 2xx response.
pub fn bad_payload(
  provider: &'static str,
) -> impl FnOnce(reqwest::Error) -> ProviderError {
  move |e| ProviderError::Payload { provider, message: e.to_string() }
}

/// Turn a non-success response into [`ProviderError::Status`], salvaging a
/// short prefix of the body as the message.
pub async fn status_error(
  provider: &'static str,
  resp: reqwest::Response,
) -> ProviderError {
  let status = resp.status().as_u16();
  let body = resp.text().await.unwrap_or_default();
  let message = body.chars().take(200).collect();
  ProviderError::Status { provider, status, message }
}
