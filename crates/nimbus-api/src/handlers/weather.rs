//! `GET /api/weather` — current-conditions proxy.

use axum::{
  Json,
  extract::{Query, State},
};
use nimbus_core::{
  provider::{Location, WeatherProvider},
  snapshot::WeatherSnapshot,
};
use serde::Deserialize;

use crate::{AppContext, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
  /// City name, e.g. `London` or `London,UK`.
  pub q:   Option<String>,
  pub lat: Option<f64>,
  pub lon: Option<f64>,
}

/// `GET /api/weather?q=<city>` or `?lat=<lat>&lon=<lon>`.
///
/// Input is validated before the provider is touched; the provider key never
/// leaves the server.
pub async fn current<C: AppContext>(
  State(ctx): State<C>,
  Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
  let location = match (params.q, params.lat, params.lon) {
    (Some(q), _, _) if !q.trim().is_empty() => Location::City(q),
    (_, Some(lat), Some(lon)) => Location::Coords { lat, lon },
    _ => {
      return Err(ApiError::BadRequest(
        "provide either q (city name) or lat and lon (coordinates)".into(),
      ));
    }
  };

  let snapshot = ctx.weather().fetch_current(&location).await?;
  Ok(Json(snapshot))
}
