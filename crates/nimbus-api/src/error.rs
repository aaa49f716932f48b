//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use nimbus_core::{
  provider::{IdentityError, ProviderError},
  store::StoreError,
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  /// An upstream provider failed while serving a proxy route.
  #[error("upstream error: {0}")]
  Provider(#[from] ProviderError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store failure, turning owner-scoped misses into 404s.
  pub fn store<E: StoreError>(e: E) -> Self {
    if e.is_not_found() {
      Self::NotFound(e.to_string())
    } else {
      Self::Store(Box::new(e))
    }
  }
}

impl From<IdentityError> for ApiError {
  fn from(e: IdentityError) -> Self {
    match e {
      IdentityError::Unauthorized => Self::Unauthorized,
      IdentityError::Provider(e) => Self::Provider(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Provider(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
