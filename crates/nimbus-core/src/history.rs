//! Notification history — the append-only log of fired notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which pipeline produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  Weather,
  SpaceWeather,
}

impl NotificationKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Weather => "weather",
      Self::SpaceWeather => "space_weather",
    }
  }
}

/// One fired notification. Created once per dispatch; the only mutation ever
/// applied is the single null→timestamp transition of `read_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
  pub record_id: Uuid,
  pub user_id: Uuid,
  pub kind: NotificationKind,
  pub title: String,
  pub message: String,
  /// Structured context (rule id, city, measured values, event list).
  pub payload: serde_json::Value,
  /// `true` only on confirmed provider-side email success.
  pub email_sent: bool,
  pub sent_at: DateTime<Utc>,
  pub read_at: Option<DateTime<Utc>>,
}

/// Input to [`crate::store::HistoryStore::append`].
/// `record_id` and `sent_at` are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewNotification {
  pub user_id: Uuid,
  pub kind: NotificationKind,
  pub title: String,
  pub message: String,
  pub payload: serde_json::Value,
  pub email_sent: bool,
}
