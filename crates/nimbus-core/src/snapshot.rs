//! Provider snapshots — transient, normalized views of one fetch from a
//! weather or space-weather provider. Never persisted as entities.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, rule::Metric};

// ─── Weather ─────────────────────────────────────────────────────────────────

/// One normalized current-conditions reading for a city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
  pub city: String,
  /// Celsius.
  pub temp: f64,
  pub feels_like: f64,
  /// Relative humidity, percent.
  pub humidity: f64,
  /// Metres per second.
  pub wind_speed: f64,
  /// Rainfall over the last hour, millimetres. Absent when no rain.
  pub rain_1h: Option<f64>,
  /// Condition labels as reported upstream, e.g. "Thunderstorm", "Clear".
  pub conditions: Vec<String>,
  /// Human-readable summary of the first condition.
  pub description: String,
  pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
  /// Extract the named metric. Rain defaults to 0 when absent.
  pub fn metric(&self, metric: Metric) -> f64 {
    match metric {
      Metric::Temperature => self.temp,
      Metric::Humidity => self.humidity,
      Metric::Wind => self.wind_speed,
      Metric::Rain => self.rain_1h.unwrap_or(0.0),
    }
  }
}

// ─── Space weather ───────────────────────────────────────────────────────────

/// Space-weather event categories recognised by the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
  /// Solar flare.
  FLR,
  /// Coronal mass ejection.
  CME,
  /// Geomagnetic storm.
  GST,
  /// Interplanetary shock.
  IPS,
  /// Magnetopause crossing.
  MPC,
  /// Radiation belt enhancement.
  RBE,
  /// Solar energetic particle event.
  SEP,
  /// High-speed stream.
  HSS,
  /// WSA-Enlil model run.
  WSA,
}

impl EventType {
  pub const ALL: [EventType; 9] = [
    Self::FLR,
    Self::CME,
    Self::GST,
    Self::IPS,
    Self::MPC,
    Self::RBE,
    Self::SEP,
    Self::HSS,
    Self::WSA,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::FLR => "FLR",
      Self::CME => "CME",
      Self::GST => "GST",
      Self::IPS => "IPS",
      Self::MPC => "MPC",
      Self::RBE => "RBE",
      Self::SEP => "SEP",
      Self::HSS => "HSS",
      Self::WSA => "WSA",
    }
  }
}

impl fmt::Display for EventType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for EventType {
  type Err = Error;

  /// Case-insensitive, matching what clients actually send.
  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_uppercase().as_str() {
      "FLR" => Ok(Self::FLR),
      "CME" => Ok(Self::CME),
      "GST" => Ok(Self::GST),
      "IPS" => Ok(Self::IPS),
      "MPC" => Ok(Self::MPC),
      "RBE" => Ok(Self::RBE),
      "SEP" => Ok(Self::SEP),
      "HSS" => Ok(Self::HSS),
      "WSA" => Ok(Self::WSA),
      other => Err(Error::UnknownEventType(other.to_string())),
    }
  }
}

/// One space-weather event from the provider's notification feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceWeatherEvent {
  pub event_type: EventType,
  pub issued_at: DateTime<Utc>,
  /// Free-text event body; severity class is scraped from here for flares.
  pub body: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn event_type_round_trips_case_insensitively() {
    assert_eq!("flr".parse::<EventType>().unwrap(), EventType::FLR);
    assert_eq!("CME".parse::<EventType>().unwrap(), EventType::CME);
    assert!("XYZ".parse::<EventType>().is_err());
  }

  #[test]
  fn rain_defaults_to_zero() {
    let snap = WeatherSnapshot {
      city: "London".into(),
      temp: 12.0,
      feels_like: 11.0,
      humidity: 70.0,
      wind_speed: 3.0,
      rain_1h: None,
      conditions: vec!["Clouds".into()],
      description: "overcast clouds".into(),
      fetched_at: Utc::now(),
    };
    assert_eq!(snap.metric(Metric::Rain), 0.0);
    assert_eq!(snap.metric(Metric::Temperature), 12.0);
  }
}
