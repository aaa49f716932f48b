//! Error type for `nimbus-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] nimbus_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored discriminant no version of the code ever wrote.
  #[error("unknown discriminant in column {column}: {value:?}")]
  UnknownDiscriminant { column: &'static str, value: String },

  #[error("alert rule not found: {0}")]
  RuleNotFound(uuid::Uuid),

  #[error("notification record not found: {0}")]
  RecordNotFound(uuid::Uuid),
}

impl nimbus_core::store::StoreError for Error {
  /// `true` for the owner-scoped lookup misses, which API layers map to 404.
  fn is_not_found(&self) -> bool {
    matches!(self, Self::RuleNotFound(_) | Self::RecordNotFound(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
