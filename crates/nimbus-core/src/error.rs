//! Error types for `nimbus-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown space-weather event type: {0:?}")]
  UnknownEventType(String),

  #[error("unknown severity class: {0:?}")]
  UnknownSeverity(String),

  #[error("a {kind} rule requires a threshold")]
  MissingThreshold { kind: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
