//! `POST /api/check` — scheduler-triggered alert scan.

use axum::{Json, extract::State, http::HeaderMap};
use nimbus_alerts::RunReport;

use crate::{AppContext, auth::require_cron_secret, error::ApiError};

/// Runs both scan phases and returns the per-phase report. Guarded by the
/// shared cron secret rather than a user token.
pub async fn run<C: AppContext>(
  State(ctx): State<C>,
  headers: HeaderMap,
) -> Result<Json<RunReport>, ApiError> {
  require_cron_secret(&headers, ctx.cron_secret())?;

  let report = ctx.engine().run_scheduled(ctx.weather(), ctx.space()).await;
  Ok(Json(report))
}
