//! `GET /api/space-weather` — event-feed proxy.

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::NaiveDate;
use nimbus_core::{
  provider::SpaceWeatherProvider,
  snapshot::{EventType, SpaceWeatherEvent},
};
use serde::Deserialize;

use crate::{AppContext, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SpaceParams {
  #[serde(rename = "type")]
  pub event_type: String,
  pub start_date: String,
  pub end_date:   String,
}

fn parse_date(label: &str, value: &str) -> Result<NaiveDate, ApiError> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
    ApiError::BadRequest(format!("{label} must be a YYYY-MM-DD date"))
  })
}

/// `GET /api/space-weather?type=FLR&start_date=...&end_date=...`.
///
/// Type and dates are validated before any network call.
pub async fn events<C: AppContext>(
  State(ctx): State<C>,
  Query(params): Query<SpaceParams>,
) -> Result<Json<Vec<SpaceWeatherEvent>>, ApiError> {
  let event_type: EventType = params.event_type.parse().map_err(|_| {
    ApiError::BadRequest(format!(
      "invalid event type {:?}; expected one of FLR, CME, GST, IPS, MPC, \
       RBE, SEP, HSS, WSA",
      params.event_type
    ))
  })?;
  let start = parse_date("start_date", &params.start_date)?;
  let end = parse_date("end_date", &params.end_date)?;

  let events = ctx.space().fetch_events(Some(event_type), start, end).await?;
  Ok(Json(events))
}
