//! Bearer extraction, user resolution, and the cron-secret check.

use axum::http::{HeaderMap, header};
use nimbus_core::provider::{AuthUser, Identity};

use crate::error::ApiError;

/// Pull the bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .filter(|t| !t.is_empty())
    .ok_or(ApiError::Unauthorized)
}

/// Resolve the caller behind the request's bearer token.
pub async fn require_user<I: Identity>(
  identity: &I,
  headers: &HeaderMap,
) -> Result<AuthUser, ApiError> {
  let token = bearer_token(headers)?;
  Ok(identity.resolve(token).await?)
}

/// The scheduled-check route authenticates with a shared secret instead of a
/// user token.
pub fn require_cron_secret(
  headers: &HeaderMap,
  secret: &str,
) -> Result<(), ApiError> {
  if bearer_token(headers)? == secret {
    Ok(())
  } else {
    Err(ApiError::Unauthorized)
  }
}
