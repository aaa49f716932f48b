//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Event-type lists and saved
//! cities are stored as compact JSON arrays. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use nimbus_core::{
  history::{NotificationKind, NotificationRecord},
  preferences::UserPreferences,
  rule::{AlertKind, AlertRule, AlertScope, Comparison, Metric},
  severity::Severity,
  snapshot::EventType,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Comparison ──────────────────────────────────────────────────────────────

pub fn decode_comparison(s: &str) -> Result<Comparison> {
  match s {
    "above" => Ok(Comparison::Above),
    "below" => Ok(Comparison::Below),
    "equals" => Ok(Comparison::Equals),
    other => Err(Error::UnknownDiscriminant {
      column: "comparison",
      value: other.to_string(),
    }),
  }
}

// ─── Severity ────────────────────────────────────────────────────────────────

pub fn decode_severity(s: &str) -> Result<Severity> {
  s.parse().map_err(Error::Core)
}

// ─── Event types ─────────────────────────────────────────────────────────────

pub fn encode_event_types(types: &[EventType]) -> Result<String> {
  let codes: Vec<&str> = types.iter().map(EventType::as_str).collect();
  Ok(serde_json::to_string(&codes)?)
}

pub fn decode_event_types(s: &str) -> Result<Vec<EventType>> {
  let codes: Vec<String> = serde_json::from_str(s)?;
  codes
    .iter()
    .map(|c| c.parse().map_err(Error::Core))
    .collect()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `alert_rules` row.
pub struct RawRule {
  pub rule_id:      String,
  pub owner_id:     String,
  pub city:         Option<String>,
  pub rule_type:    String,
  pub comparison:   Option<String>,
  pub threshold:    Option<f64>,
  pub event_types:  Option<String>,
  pub min_severity: Option<String>,
  pub enabled:      bool,
  pub created_at:   String,
}

impl RawRule {
  pub fn into_rule(self) -> Result<AlertRule> {
    let kind = self.decode_kind()?;
    let scope = match self.city {
      Some(city) => AlertScope::City(city),
      None => AlertScope::Space,
    };

    Ok(AlertRule {
      rule_id: decode_uuid(&self.rule_id)?,
      owner_id: decode_uuid(&self.owner_id)?,
      scope,
      kind,
      enabled: self.enabled,
      created_at: decode_dt(&self.created_at)?,
    })
  }

  fn decode_kind(&self) -> Result<AlertKind> {
    let metric = match self.rule_type.as_str() {
      "temperature" => Metric::Temperature,
      "humidity" => Metric::Humidity,
      "wind" => Metric::Wind,
      "rain" => Metric::Rain,
      "storm" => return Ok(AlertKind::Storm),
      "space" => {
        let event_types = self
          .event_types
          .as_deref()
          .map(decode_event_types)
          .transpose()?
          .unwrap_or_default();
        let min_severity = self
          .min_severity
          .as_deref()
          .map(decode_severity)
          .transpose()?
          .unwrap_or(Severity::C);
        return Ok(AlertKind::SpaceEvents { event_types, min_severity });
      }
      other => {
        // The original evaluated unknown kinds to a silent non-trigger;
        // here they cannot exist past this boundary.
        return Err(Error::UnknownDiscriminant {
          column: "rule_type",
          value: other.to_string(),
        });
      }
    };

    let comparison = self
      .comparison
      .as_deref()
      .map(decode_comparison)
      .transpose()?
      .ok_or(Error::Core(nimbus_core::Error::MissingThreshold {
        kind: metric.as_str(),
      }))?;
    let threshold =
      self
        .threshold
        .ok_or(Error::Core(nimbus_core::Error::MissingThreshold {
          kind: metric.as_str(),
        }))?;

    Ok(AlertKind::Metric { metric, comparison, threshold })
  }
}

/// Column values for inserting an [`AlertRule`].
pub struct RuleColumns {
  pub city:         Option<String>,
  pub rule_type:    &'static str,
  pub comparison:   Option<&'static str>,
  pub threshold:    Option<f64>,
  pub event_types:  Option<String>,
  pub min_severity: Option<&'static str>,
}

pub fn rule_columns(scope: &AlertScope, kind: &AlertKind) -> Result<RuleColumns> {
  let mut cols = RuleColumns {
    city: scope.city().map(str::to_owned),
    rule_type: kind.discriminant(),
    comparison: None,
    threshold: None,
    event_types: None,
    min_severity: None,
  };
  match kind {
    AlertKind::Metric { comparison, threshold, .. } => {
      cols.comparison = Some(comparison.as_str());
      cols.threshold = Some(*threshold);
    }
    AlertKind::Storm => {}
    AlertKind::SpaceEvents { event_types, min_severity } => {
      cols.event_types = Some(encode_event_types(event_types)?);
      cols.min_severity = Some(min_severity.as_str());
    }
  }
  Ok(cols)
}

/// Raw strings read directly from a `user_preferences` row.
pub struct RawPreferences {
  pub user_id:               String,
  pub saved_cities:          String,
  pub default_city:          Option<String>,
  pub notifications_enabled: bool,
  pub email_notifications:   bool,
  pub updated_at:            String,
}

impl RawPreferences {
  pub fn into_preferences(self) -> Result<UserPreferences> {
    Ok(UserPreferences {
      user_id: decode_uuid(&self.user_id)?,
      saved_cities: serde_json::from_str(&self.saved_cities)?,
      default_city: self.default_city,
      notifications_enabled: self.notifications_enabled,
      email_notifications: self.email_notifications,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `notification_history` row.
pub struct RawNotification {
  pub record_id:  String,
  pub user_id:    String,
  pub kind:       String,
  pub title:      String,
  pub message:    String,
  pub payload:    String,
  pub email_sent: bool,
  pub sent_at:    String,
  pub read_at:    Option<String>,
}

impl RawNotification {
  pub fn into_record(self) -> Result<NotificationRecord> {
    let kind = match self.kind.as_str() {
      "weather" => NotificationKind::Weather,
      "space_weather" => NotificationKind::SpaceWeather,
      other => {
        return Err(Error::UnknownDiscriminant {
          column: "kind",
          value: other.to_string(),
        });
      }
    };

    Ok(NotificationRecord {
      record_id: decode_uuid(&self.record_id)?,
      user_id: decode_uuid(&self.user_id)?,
      kind,
      title: self.title,
      message: self.message,
      payload: serde_json::from_str(&self.payload)?,
      email_sent: self.email_sent,
      sent_at: decode_dt(&self.sent_at)?,
      read_at: self.read_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
