//! Error type for `nimbus-alerts`.

use nimbus_core::provider::ProviderError;
use thiserror::Error;

/// Store backends bring their own error types; the engine only needs them to
/// be displayable and sendable.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] BoxError),

  #[error(transparent)]
  Provider(#[from] ProviderError),
}

impl Error {
  pub fn store(e: impl Into<BoxError>) -> Self { Self::Store(e.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
