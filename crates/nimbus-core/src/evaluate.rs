//! The condition evaluator — the pure decision core of the alert pipeline.
//!
//! `evaluate` is deterministic and side-effect free: given the same rule and
//! snapshot it always returns the same trigger decision, which is what makes
//! the scanner trivially testable. Any mismatch between a rule and the
//! snapshot it is evaluated against yields `false` (fail closed, no error).

use crate::{
  rule::{AlertKind, AlertRule, Comparison},
  severity::parse_flare_class,
  snapshot::{EventType, SpaceWeatherEvent, WeatherSnapshot},
};

/// A borrowed view of whichever provider payload a scan pass is holding.
#[derive(Debug, Clone, Copy)]
pub enum ProviderSnapshot<'a> {
  Weather(&'a WeatherSnapshot),
  Space(&'a [SpaceWeatherEvent]),
}

/// Decide whether `rule` triggers against `snapshot`.
pub fn evaluate(rule: &AlertRule, snapshot: ProviderSnapshot<'_>) -> bool {
  match (&rule.kind, snapshot) {
    (AlertKind::Metric { metric, comparison, threshold }, ProviderSnapshot::Weather(snap)) => {
      compare(snap.metric(*metric), *comparison, *threshold)
    }
    (AlertKind::Storm, ProviderSnapshot::Weather(snap)) => snap
      .conditions
      .iter()
      .any(|c| c == "Thunderstorm" || c == "Squall"),
    (AlertKind::SpaceEvents { event_types, min_severity }, ProviderSnapshot::Space(events)) => {
      events
        .iter()
        .any(|ev| event_matches(ev, event_types, *min_severity))
    }
    // Weather rule against space data or vice versa: never trigger.
    _ => false,
  }
}

fn compare(value: f64, comparison: Comparison, threshold: f64) -> bool {
  match comparison {
    Comparison::Above => value > threshold,
    Comparison::Below => value < threshold,
    // Tolerance band of one unit, not exact equality. Deliberate: users
    // asking for "equals 20" mean "around 20", not a float bit-match.
    Comparison::Equals => (value - threshold).abs() < 1.0,
  }
}

fn event_matches(
  event: &SpaceWeatherEvent,
  event_types: &[EventType],
  min_severity: crate::severity::Severity,
) -> bool {
  if !event_types.contains(&event.event_type) {
    return false;
  }
  if event.event_type == EventType::FLR {
    // Flares are gated on class; an unparseable body fails the gate.
    return match parse_flare_class(&event.body) {
      Some(class) => class.meets(min_severity),
      None => false,
    };
  }
  true
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{
    rule::{AlertScope, Metric, NewAlertRule},
    severity::Severity,
  };

  fn rule(kind: AlertKind) -> AlertRule {
    let scope = match kind {
      AlertKind::SpaceEvents { .. } => AlertScope::Space,
      _ => AlertScope::City("London".into()),
    };
    let input = NewAlertRule::new(Uuid::new_v4(), scope, kind);
    AlertRule {
      rule_id: Uuid::new_v4(),
      owner_id: input.owner_id,
      scope: input.scope,
      kind: input.kind,
      enabled: true,
      created_at: Utc::now(),
    }
  }

  fn metric_rule(metric: Metric, comparison: Comparison, threshold: f64) -> AlertRule {
    rule(AlertKind::Metric { metric, comparison, threshold })
  }

  fn snapshot(temp: f64) -> WeatherSnapshot {
    WeatherSnapshot {
      city: "London".into(),
      temp,
      feels_like: temp,
      humidity: 60.0,
      wind_speed: 4.0,
      rain_1h: None,
      conditions: vec!["Clouds".into()],
      description: "overcast clouds".into(),
      fetched_at: Utc::now(),
    }
  }

  fn flare(event_type: EventType, body: &str) -> SpaceWeatherEvent {
    SpaceWeatherEvent {
      event_type,
      issued_at: Utc::now(),
      body: body.into(),
    }
  }

  // ── Metric comparisons ─────────────────────────────────────────────────────

  #[test]
  fn above_is_strict() {
    let r = metric_rule(Metric::Temperature, Comparison::Above, 20.0);
    assert!(evaluate(&r, ProviderSnapshot::Weather(&snapshot(20.1))));
    // Boundary: value == threshold does not trigger.
    assert!(!evaluate(&r, ProviderSnapshot::Weather(&snapshot(20.0))));
    assert!(!evaluate(&r, ProviderSnapshot::Weather(&snapshot(19.9))));
  }

  #[test]
  fn below_is_strict() {
    let r = metric_rule(Metric::Temperature, Comparison::Below, 10.0);
    assert!(evaluate(&r, ProviderSnapshot::Weather(&snapshot(5.0))));
    assert!(!evaluate(&r, ProviderSnapshot::Weather(&snapshot(10.0))));
  }

  #[test]
  fn equals_uses_one_unit_tolerance() {
    let r = metric_rule(Metric::Temperature, Comparison::Equals, 20.0);
    assert!(evaluate(&r, ProviderSnapshot::Weather(&snapshot(20.9))));
    assert!(evaluate(&r, ProviderSnapshot::Weather(&snapshot(19.1))));
    assert!(!evaluate(&r, ProviderSnapshot::Weather(&snapshot(21.0))));
    assert!(!evaluate(&r, ProviderSnapshot::Weather(&snapshot(19.0))));
  }

  #[test]
  fn rain_rule_treats_missing_rain_as_zero() {
    let r = metric_rule(Metric::Rain, Comparison::Above, 0.5);
    let mut snap = snapshot(15.0);
    assert!(!evaluate(&r, ProviderSnapshot::Weather(&snap)));
    snap.rain_1h = Some(2.0);
    assert!(evaluate(&r, ProviderSnapshot::Weather(&snap)));
  }

  // ── Storm ──────────────────────────────────────────────────────────────────

  #[test]
  fn storm_matches_condition_labels_only() {
    let r = rule(AlertKind::Storm);
    let mut snap = snapshot(18.0);
    assert!(!evaluate(&r, ProviderSnapshot::Weather(&snap)));

    snap.conditions = vec!["Rain".into(), "Thunderstorm".into()];
    assert!(evaluate(&r, ProviderSnapshot::Weather(&snap)));

    snap.conditions = vec!["Squall".into()];
    assert!(evaluate(&r, ProviderSnapshot::Weather(&snap)));

    // Lowercase labels are different labels upstream; no match.
    snap.conditions = vec!["thunderstorm".into()];
    assert!(!evaluate(&r, ProviderSnapshot::Weather(&snap)));
  }

  // ── Space events ───────────────────────────────────────────────────────────

  fn flare_rule(min_severity: Severity) -> AlertRule {
    rule(AlertKind::SpaceEvents {
      event_types: vec![EventType::FLR],
      min_severity,
    })
  }

  #[test]
  fn flare_severity_gate() {
    let r = flare_rule(Severity::M);
    let m5 = [flare(EventType::FLR, "Significant flare, class M5.1 peak")];
    let c3 = [flare(EventType::FLR, "Minor flare, class C3.0 peak")];
    assert!(evaluate(&r, ProviderSnapshot::Space(&m5)));
    assert!(!evaluate(&r, ProviderSnapshot::Space(&c3)));
  }

  #[test]
  fn non_matching_event_type_never_triggers() {
    let r = flare_rule(Severity::M);
    // A CME body mentioning "M5" is still not a flare.
    let cme = [flare(EventType::CME, "CME associated with the M5 flare")];
    assert!(!evaluate(&r, ProviderSnapshot::Space(&cme)));
  }

  #[test]
  fn unparseable_flare_body_fails_the_gate() {
    let r = flare_rule(Severity::C);
    let events = [flare(EventType::FLR, "flare observed, class unavailable")];
    assert!(!evaluate(&r, ProviderSnapshot::Space(&events)));
  }

  #[test]
  fn non_flare_types_need_no_severity() {
    let r = rule(AlertKind::SpaceEvents {
      event_types: vec![EventType::GST],
      min_severity: Severity::X,
    });
    let events = [flare(EventType::GST, "geomagnetic storm, Kp=7")];
    assert!(evaluate(&r, ProviderSnapshot::Space(&events)));
  }

  // ── Fail-closed mismatches ─────────────────────────────────────────────────

  #[test]
  fn scope_mismatch_fails_closed() {
    let weather = snapshot(30.0);
    let space_rule = flare_rule(Severity::C);
    assert!(!evaluate(&space_rule, ProviderSnapshot::Weather(&weather)));

    let events = [flare(EventType::FLR, "class X9.3 peak")];
    let temp_rule = metric_rule(Metric::Temperature, Comparison::Above, 0.0);
    assert!(!evaluate(&temp_rule, ProviderSnapshot::Space(&events)));
  }
}
