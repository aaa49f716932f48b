//! Per-user preference records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One record per user, created lazily on first authenticated read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
  pub user_id: Uuid,
  /// Ordered list of cities shown on the dashboard.
  pub saved_cities: Vec<String>,
  pub default_city: Option<String>,
  /// Master switch: when `false`, the user is fully silenced — no rule of
  /// theirs is even evaluated.
  pub notifications_enabled: bool,
  /// Whether triggered alerts also go out by email.
  pub email_notifications: bool,
  pub updated_at: DateTime<Utc>,
}

impl UserPreferences {
  /// The defaults written on first read: in-app notifications on, email off
  /// until explicitly opted in.
  pub fn defaults(user_id: Uuid) -> Self {
    Self {
      user_id,
      saved_cities: Vec::new(),
      default_city: None,
      notifications_enabled: true,
      email_notifications: false,
      updated_at: Utc::now(),
    }
  }
}

/// Partial update applied by
/// [`crate::store::PreferenceStore::upsert_preferences`].
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
  pub saved_cities: Option<Vec<String>>,
  // Double-Option: outer None = untouched, inner None = cleared.
  #[serde(default, with = "double_option")]
  pub default_city: Option<Option<String>>,
  pub notifications_enabled: Option<bool>,
  pub email_notifications: Option<bool>,
}

mod double_option {
  use serde::{Deserialize, Deserializer};

  pub fn deserialize<'de, D>(
    d: D,
  ) -> Result<Option<Option<String>>, D::Error>
  where
    D: Deserializer<'de>,
  {
    Option::<String>::deserialize(d).map(Some)
  }
}
