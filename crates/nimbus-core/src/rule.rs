//! Alert rules — stored, user-owned conditions over provider data.
//!
//! A rule is owned by exactly one user and scoped to either a city (weather
//! rules) or to space weather as a whole. The threshold-required invariant is
//! carried by the type: only [`AlertKind::Metric`] has a threshold field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{severity::Severity, snapshot::EventType};

// ─── Scope ───────────────────────────────────────────────────────────────────

/// What a rule watches: one named city, or the space-weather event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AlertScope {
  City(String),
  Space,
}

impl AlertScope {
  /// The city name, for weather-scoped rules.
  pub fn city(&self) -> Option<&str> {
    match self {
      Self::City(c) => Some(c),
      Self::Space => None,
    }
  }
}

// ─── Weather metrics ─────────────────────────────────────────────────────────

/// A numeric reading extracted from a weather snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
  Temperature,
  Humidity,
  Wind,
  Rain,
}

impl Metric {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Temperature => "temperature",
      Self::Humidity => "humidity",
      Self::Wind => "wind",
      Self::Rain => "rain",
    }
  }

  /// Unit suffix used in notification messages.
  pub fn unit(&self) -> &'static str {
    match self {
      Self::Temperature => "°C",
      Self::Humidity => "%",
      Self::Wind => " m/s",
      Self::Rain => " mm",
    }
  }
}

/// How a measured value is compared against a rule threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
  Above,
  Below,
  Equals,
}

impl Comparison {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Above => "above",
      Self::Below => "below",
      Self::Equals => "equals",
    }
  }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The condition a rule expresses. The variant name doubles as the
/// `rule_type` discriminant stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertKind {
  /// Numeric comparison against one weather metric.
  Metric {
    metric: Metric,
    comparison: Comparison,
    threshold: f64,
  },
  /// Fires on thunderstorm/squall condition labels; no threshold.
  Storm,
  /// Fires on matching space-weather events. Solar flares (`FLR`) are
  /// additionally gated on `min_severity`.
  SpaceEvents {
    event_types: Vec<EventType>,
    min_severity: Severity,
  },
}

impl AlertKind {
  /// The discriminant string stored in the `rule_type` column.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::Metric { metric, .. } => metric.as_str(),
      Self::Storm => "storm",
      Self::SpaceEvents { .. } => "space",
    }
  }
}

// ─── Rule ────────────────────────────────────────────────────────────────────

/// A stored alert rule. Created, toggled, and deleted only by its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
  pub rule_id: Uuid,
  pub owner_id: Uuid,
  pub scope: AlertScope,
  pub kind: AlertKind,
  pub enabled: bool,
  /// Server-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::AlertRuleStore::create_rule`].
/// `rule_id` and `created_at` are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAlertRule {
  pub owner_id: Uuid,
  pub scope: AlertScope,
  pub kind: AlertKind,
  pub enabled: bool,
}

impl NewAlertRule {
  pub fn new(owner_id: Uuid, scope: AlertScope, kind: AlertKind) -> Self {
    Self { owner_id, scope, kind, enabled: true }
  }
}
