//! `/api/alerts` — alert-rule CRUD, always owner-scoped.
//!
//! | Method   | Path                  | Notes |
//! |----------|-----------------------|-------|
//! | `GET`    | `/alerts`             | Own rules, newest first |
//! | `POST`   | `/alerts`             | Body: [`NewRuleBody`]; 201 + stored rule |
//! | `DELETE` | `/alerts/:id`         | 204; foreign id behaves like missing |
//! | `POST`   | `/alerts/:id/toggle`  | Flips `enabled`, returns the rule |

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use nimbus_core::{
  rule::{AlertKind, AlertRule, AlertScope, Comparison, Metric, NewAlertRule},
  severity::Severity,
  snapshot::EventType,
  store::AlertRuleStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppContext, auth::require_user, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /alerts`
pub async fn list<C: AppContext>(
  State(ctx): State<C>,
  headers: HeaderMap,
) -> Result<Json<Vec<AlertRule>>, ApiError> {
  let user = require_user(ctx.identity(), &headers).await?;
  let rules = ctx
    .store()
    .list_rules(user.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rules))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /alerts`. The shape requirements depend on
/// `rule_type`; violations are rejected with 400 before anything is stored.
#[derive(Debug, Deserialize)]
pub struct NewRuleBody {
  pub rule_type: String,
  pub city: Option<String>,
  pub comparison: Option<Comparison>,
  pub threshold: Option<f64>,
  #[serde(default)]
  pub event_types: Vec<String>,
  pub min_severity: Option<Severity>,
  pub enabled: Option<bool>,
}

impl NewRuleBody {
  fn into_scope_and_kind(self) -> Result<(AlertScope, AlertKind), ApiError> {
    let metric = match self.rule_type.as_str() {
      "temperature" => Metric::Temperature,
      "humidity" => Metric::Humidity,
      "wind" => Metric::Wind,
      "rain" => Metric::Rain,
      "storm" => {
        let city = require_city(self.city, "storm")?;
        return Ok((AlertScope::City(city), AlertKind::Storm));
      }
      "space" => {
        if self.event_types.is_empty() {
          return Err(ApiError::BadRequest(
            "space rules require at least one event type".into(),
          ));
        }
        let mut event_types = Vec::with_capacity(self.event_types.len());
        for raw in &self.event_types {
          let parsed: EventType = raw.parse().map_err(|_| {
            ApiError::BadRequest(format!("invalid event type {raw:?}"))
          })?;
          if !event_types.contains(&parsed) {
            event_types.push(parsed);
          }
        }
        let min_severity = self.min_severity.unwrap_or(Severity::C);
        return Ok((
          AlertScope::Space,
          AlertKind::SpaceEvents { event_types, min_severity },
        ));
      }
      other => {
        return Err(ApiError::BadRequest(format!(
          "unknown rule_type {other:?}"
        )));
      }
    };

    let city = require_city(self.city, "weather")?;
    let comparison = self.comparison.ok_or_else(|| {
      ApiError::BadRequest(format!(
        "{} rules require a comparison",
        self.rule_type
      ))
    })?;
    let threshold = self.threshold.ok_or_else(|| {
      ApiError::BadRequest(format!(
        "{} rules require a threshold",
        self.rule_type
      ))
    })?;

    Ok((
      AlertScope::City(city),
      AlertKind::Metric { metric, comparison, threshold },
    ))
  }
}

fn require_city(
  city: Option<String>,
  label: &str,
) -> Result<String, ApiError> {
  city
    .filter(|c| !c.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest(format!("{label} rules require a city")))
}

/// `POST /alerts` — returns 201 + the stored rule.
pub async fn create<C: AppContext>(
  State(ctx): State<C>,
  headers: HeaderMap,
  Json(body): Json<NewRuleBody>,
) -> Result<impl IntoResponse, ApiError> {
  let user = require_user(ctx.identity(), &headers).await?;
  let enabled = body.enabled.unwrap_or(true);
  let (scope, kind) = body.into_scope_and_kind()?;

  let mut input = NewAlertRule::new(user.user_id, scope, kind);
  input.enabled = enabled;

  let rule =
    ctx.store().create_rule(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(rule)))
}

// ─── Toggle ──────────────────────────────────────────────────────────────────

/// `POST /alerts/:id/toggle`
pub async fn toggle<C: AppContext>(
  State(ctx): State<C>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<AlertRule>, ApiError> {
  let user = require_user(ctx.identity(), &headers).await?;

  let rules = ctx
    .store()
    .list_rules(user.user_id)
    .await
    .map_err(ApiError::store)?;
  let current = rules
    .iter()
    .find(|r| r.rule_id == id)
    .ok_or_else(|| ApiError::NotFound(format!("alert rule {id} not found")))?;

  let updated = ctx
    .store()
    .set_rule_enabled(id, user.user_id, !current.enabled)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(updated))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /alerts/:id` — 204 on success.
pub async fn remove<C: AppContext>(
  State(ctx): State<C>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let user = require_user(ctx.identity(), &headers).await?;
  ctx
    .store()
    .delete_rule(id, user.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
