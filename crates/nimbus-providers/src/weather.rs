//! OpenWeatherMap current-conditions client.

use chrono::Utc;
use nimbus_core::{
  provider::{Location, ProviderError, WeatherProvider},
  snapshot::WeatherSnapshot,
};
use serde::Deserialize;

use crate::http::{bad_payload, status_error, unreachable};

const PROVIDER: &str = "openweathermap";

/// Client for the OpenWeatherMap `/data/2.5/weather` endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. The API key
/// travels only in the outbound query string.
#[derive(Clone)]
pub struct OpenWeatherClient {
  client:   reqwest::Client,
  base_url: String,
  api_key:  String,
}

impl OpenWeatherClient {
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

impl WeatherProvider for OpenWeatherClient {
  async fn fetch_current(
    &self,
    location: &Location,
  ) -> Result<WeatherSnapshot, ProviderError> {
    let url = format!(
      "{}/data/2.5/weather",
      self.base_url.trim_end_matches('/')
    );

    let mut req = self
      .client
      .get(url)
      .query(&[("appid", self.api_key.as_str()), ("units", "metric")]);
    req = match location {
      Location::City(city) => req.query(&[("q", city.as_str())]),
      Location::Coords { lat, lon } => {
        req.query(&[("lat", lat), ("lon", lon)])
      }
    };

    let resp = req.send().await.map_err(unreachable(PROVIDER))?;
    if !resp.status().is_success() {
      return Err(status_error(PROVIDER, resp).await);
    }

    let body: CurrentWeather =
      resp.json().await.map_err(bad_payload(PROVIDER))?;
    Ok(body.into_snapshot())
  }
}

// ─── Response payload ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CurrentWeather {
  name:    String,
  main:    MainReadings,
  #[serde(default)]
  wind:    Wind,
  rain:    Option<Rain>,
  #[serde(default)]
  weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
  temp:       f64,
  feels_like: f64,
  humidity:   f64,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
  speed: f64,
}

#[derive(Debug, Deserialize)]
struct Rain {
  /// Rainfall over the last hour in mm. Absent entirely when dry.
  #[serde(rename = "1h")]
  one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Condition {
  main:        String,
  description: String,
}

impl CurrentWeather {
  fn into_snapshot(self) -> WeatherSnapshot {
    WeatherSnapshot {
      city:       self.name,
      temp:       self.main.temp,
      feels_like: self.main.feels_like,
      humidity:   self.main.humidity,
      wind_speed: self.wind.speed,
      rain_1h:    self.rain.and_then(|r| r.one_hour),
      description: self
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_default(),
      conditions: self.weather.into_iter().map(|w| w.main).collect(),
      fetched_at: Utc::now(),
    }
  }
}
