//! Bearer-token resolution against a GoTrue-style identity endpoint.

use nimbus_core::provider::{
  AuthUser, Directory, Identity, IdentityError, ProviderError,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::http::{bad_payload, status_error, unreachable};

const PROVIDER: &str = "identity";

/// Resolves bearer tokens via `GET /auth/v1/user`.
///
/// The anon key authenticates this service to the identity host; the bearer
/// token identifies the end user. Both travel only in request headers.
#[derive(Clone)]
pub struct GoTrueIdentity {
  client:   reqwest::Client,
  base_url: String,
  anon_key: String,
}

impl GoTrueIdentity {
  pub fn new(
    client: reqwest::Client,
    base_url: impl Into<String>,
    anon_key: impl Into<String>,
  ) -> Self {
    Self {
      client,
      base_url: base_url.into(),
      anon_key: anon_key.into(),
    }
  }
}

#[derive(Deserialize)]
struct UserResponse {
  id:    String,
  email: String,
}

impl Identity for GoTrueIdentity {
  async fn resolve(&self, bearer: &str) -> Result<AuthUser, IdentityError> {
    let url = format!("{}/auth/v1/user", self.base_url.trim_end_matches('/'));

    let resp = self
      .client
      .get(url)
      .bearer_auth(bearer)
      .header("apikey", &self.anon_key)
      .send()
      .await
      .map_err(unreachable(PROVIDER))
      .map_err(IdentityError::Provider)?;

    // Expired and malformed tokens both come back as auth failures.
    if resp.status() == reqwest::StatusCode::UNAUTHORIZED
      || resp.status() == reqwest::StatusCode::FORBIDDEN
    {
      return Err(IdentityError::Unauthorized);
    }
    if !resp.status().is_success() {
      return Err(status_error(PROVIDER, resp).await.into());
    }

    let body: UserResponse = resp
      .json()
      .await
      .map_err(bad_payload(PROVIDER))
      .map_err(IdentityError::Provider)?;
    let user_id = body.id.parse().map_err(|_| {
      IdentityError::Provider(ProviderError::Payload {
        provider: PROVIDER,
        message:  "user id is not a uuid".into(),
      })
    })?;

    Ok(AuthUser { user_id, email: body.email })
  }
}

/// Privileged lookup via `GET /auth/v1/admin/users/{id}`, authenticated with
/// the service-role key. Used only from the dispatcher, never on behalf of
/// an end-user request.
#[derive(Clone)]
pub struct GoTrueDirectory {
  client:      reqwest::Client,
  base_url:    String,
  service_key: String,
}

impl GoTrueDirectory {
  pub fn new(
    client: reqwest::Client,
    base_url: impl Into<String>,
    service_key: impl Into<String>,
  ) -> Self {
    Self {
      client,
      base_url: base_url.into(),
      service_key: service_key.into(),
    }
  }
}

impl Directory for GoTrueDirectory {
  async fn email_for(
    &self,
    user_id: Uuid,
  ) -> Result<Option<String>, ProviderError> {
    let url = format!(
      "{}/auth/v1/admin/users/{}",
      self.base_url.trim_end_matches('/'),
      user_id
    );

    let resp = self
      .client
      .get(url)
      .bearer_auth(&self.service_key)
      .header("apikey", &self.service_key)
      .send()
      .await
      .map_err(unreachable(PROVIDER))?;
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !resp.status().is_success() {
      return Err(status_error(PROVIDER, resp).await);
    }

    let body: UserResponse = resp.json().await.map_err(bad_payload(PROVIDER))?;
    Ok(Some(body.email))
  }
}
