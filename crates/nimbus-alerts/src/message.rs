//! Notification text and email bodies.
//!
//! All composition is deterministic: the same rule and snapshot always
//! produce the same strings, which is what the dispatch tests pin down.

use nimbus_core::{
  rule::{AlertKind, Comparison, Metric},
  snapshot::{EventType, SpaceWeatherEvent, WeatherSnapshot},
};

pub const SPACE_TITLE: &str = "Space Weather Alert";

pub fn weather_title(kind: &AlertKind, city: &str) -> String {
  format!("Weather Alert: {} in {}", kind.discriminant(), city)
}

pub fn metric_message(
  metric: Metric,
  comparison: Comparison,
  threshold: f64,
  city: &str,
  value: f64,
) -> String {
  format!(
    "{} is {} {} in {}. Current: {}{}",
    metric.as_str(),
    comparison.as_str(),
    threshold,
    city,
    value,
    metric.unit()
  )
}

pub fn storm_message(city: &str, description: &str) -> String {
  format!("storm conditions detected in {city}. Current: {description}")
}

/// `"Space weather events detected: FLR, CME"` — unique types in first-seen
/// order across the whole batch.
pub fn space_message(events: &[SpaceWeatherEvent]) -> String {
  let mut seen: Vec<EventType> = Vec::new();
  for event in events {
    if !seen.contains(&event.event_type) {
      seen.push(event.event_type);
    }
  }
  let types: Vec<&str> = seen.iter().map(EventType::as_str).collect();
  format!("Space weather events detected: {}", types.join(", "))
}

// ─── Email bodies ────────────────────────────────────────────────────────────

pub fn weather_email_html(
  title: &str,
  message: &str,
  city: &str,
  snapshot: &WeatherSnapshot,
) -> String {
  format!(
    "<html><body>\
     <h1>{title}</h1>\
     <p>{message}</p>\
     <h2>Current conditions in {city}</h2>\
     <ul>\
     <li>Temperature: {temp}°C (feels like {feels}°C)</li>\
     <li>Humidity: {humidity}%</li>\
     <li>Wind: {wind} m/s</li>\
     <li>Conditions: {description}</li>\
     </ul>\
     </body></html>",
    temp = snapshot.temp,
    feels = snapshot.feels_like,
    humidity = snapshot.humidity,
    wind = snapshot.wind_speed,
    description = snapshot.description,
  )
}

pub fn space_email_html(events: &[SpaceWeatherEvent]) -> String {
  let mut items = String::new();
  for event in events.iter().take(5) {
    let preview: String = event.body.chars().take(200).collect();
    items.push_str(&format!(
      "<li><strong>{}</strong> — {}<br>{}</li>",
      event.event_type,
      event.issued_at.to_rfc3339(),
      preview
    ));
  }
  format!(
    "<html><body>\
     <h1>{SPACE_TITLE}</h1>\
     <p>New space weather events detected in the last 24 hours:</p>\
     <ul>{items}</ul>\
     </body></html>"
  )
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn event(event_type: EventType) -> SpaceWeatherEvent {
    SpaceWeatherEvent {
      event_type,
      issued_at: Utc::now(),
      body: "test body".into(),
    }
  }

  #[test]
  fn metric_message_wording() {
    let msg = metric_message(
      Metric::Temperature,
      Comparison::Below,
      10.0,
      "London",
      5.0,
    );
    assert_eq!(msg, "temperature is below 10 in London. Current: 5°C");
  }

  #[test]
  fn metric_message_uses_metric_unit() {
    let msg =
      metric_message(Metric::Wind, Comparison::Above, 15.0, "Oslo", 17.3);
    assert_eq!(msg, "wind is above 15 in Oslo. Current: 17.3 m/s");
  }

  #[test]
  fn space_message_deduplicates_types_in_order() {
    let events = vec![
      event(EventType::FLR),
      event(EventType::CME),
      event(EventType::FLR),
    ];
    assert_eq!(
      space_message(&events),
      "Space weather events detected: FLR, CME"
    );
  }
}
