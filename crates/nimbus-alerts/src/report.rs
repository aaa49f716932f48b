//! Serializable summaries returned by scan passes and scheduled runs.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What one scan pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
  /// Rules evaluated after the owner-preference gate.
  pub rules_checked: usize,
  /// Rules that fired and went through dispatch.
  pub rules_triggered: usize,
}

/// Outcome of one orchestrator phase. A failed phase never prevents the
/// other phase from running.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhaseReport<T> {
  Completed {
    #[serde(flatten)]
    summary: T,
  },
  Failed {
    error: String,
  },
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WeatherSummary {
  pub cities_checked: usize,
  /// Cities whose fetch failed; counted, never fatal to the phase.
  pub cities_failed: usize,
  pub rules_checked: usize,
  pub notifications_sent: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SpaceSummary {
  /// Events from the last 24 hours, before any rule matching.
  pub events_found: usize,
  pub rules_checked: usize,
  pub notifications_sent: usize,
}

/// Returned by `POST /api/check`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub ran_at: DateTime<Utc>,
  pub weather: PhaseReport<WeatherSummary>,
  pub space: PhaseReport<SpaceSummary>,
}
