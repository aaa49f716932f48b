//! NASA DONKI space-weather notifications client.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use nimbus_core::{
  provider::{ProviderError, SpaceWeatherProvider},
  snapshot::{EventType, SpaceWeatherEvent},
};
use serde::Deserialize;

use crate::http::{bad_payload, status_error, unreachable};

const PROVIDER: &str = "donki";

/// Client for the DONKI `/DONKI/notifications` feed.
///
/// The feed carries every event class in one stream; filtering by type is
/// done with the `type` query parameter (`all` when unfiltered).
#[derive(Clone)]
pub struct DonkiClient {
  client:   reqwest::Client,
  base_url: String,
  api_key:  String,
}

impl DonkiClient {
  pub fn new(
    client: reqwest::Client,
    base_url: impl Into<String>,
    api_key: impl Into<String>,
  ) -> Self {
    Self {
      client,
      base_url: base_url.into(),
      api_key: api_key.into(),
    }
  }
}

impl SpaceWeatherProvider for DonkiClient {
  async fn fetch_events(
    &self,
    event_type: Option<EventType>,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<SpaceWeatherEvent>, ProviderError> {
    let url = format!(
      "{}/DONKI/notifications",
      self.base_url.trim_end_matches('/')
    );
    let type_param = event_type.map_or("all", |t| t.as_str());

    let resp = self
      .client
      .get(url)
      .query(&[
        ("api_key", self.api_key.as_str()),
        ("type", type_param),
        ("startDate", &start.format("%Y-%m-%d").to_string()),
        ("endDate", &end.format("%Y-%m-%d").to_string()),
      ])
      .send()
      .await
      .map_err(unreachable(PROVIDER))?;
    if !resp.status().is_success() {
      return Err(status_error(PROVIDER, resp).await);
    }

    let items: Vec<Notification> =
      resp.json().await.map_err(bad_payload(PROVIDER))?;
    Ok(items.into_iter().filter_map(Notification::into_event).collect())
  }
}

// ─── Feed payload ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Notification {
  #[serde(rename = "messageType")]
  message_type:       String,
  #[serde(rename = "messageIssueTime")]
  message_issue_time: String,
  #[serde(rename = "messageBody", default)]
  message_body:       String,
}

impl Notification {
  /// Convert one feed item, dropping it when the type is not one we track
  /// or the timestamp cannot be read.
  fn into_event(self) -> Option<SpaceWeatherEvent> {
    let Ok(event_type) = self.message_type.parse::<EventType>() else {
      tracing::debug!(message_type = %self.message_type, "skipping feed item");
      return None;
    };
    let Some(issued_at) = parse_issue_time(&self.message_issue_time) else {
      tracing::debug!(
        issue_time = %self.message_issue_time,
        "skipping feed item with unreadable timestamp"
      );
      return None;
    };

    Some(SpaceWeatherEvent {
      event_type,
      issued_at,
      body: self.message_body,
    })
  }
}

/// The feed emits minute-precision stamps like `2024-05-10T16:46Z`, which is
/// not quite RFC 3339. Accept both.
fn parse_issue_time(s: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ")
    .ok()
    .map(|naive| naive.and_utc())
}
