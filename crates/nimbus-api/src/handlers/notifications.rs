//! `/api/notifications` — per-user notification history.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::HeaderMap,
};
use nimbus_core::{history::NotificationRecord, store::HistoryStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppContext, auth::require_user, error::ApiError};

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /api/notifications?limit=N` — newest first, default 50.
pub async fn list<C: AppContext>(
  State(ctx): State<C>,
  headers: HeaderMap,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<NotificationRecord>>, ApiError> {
  let user = require_user(ctx.identity(), &headers).await?;
  let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

  let records = ctx
    .store()
    .list_for_user(user.user_id, limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(records))
}

/// `POST /api/notifications/:id/read` — idempotent; the first read timestamp
/// sticks.
pub async fn mark_read<C: AppContext>(
  State(ctx): State<C>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<NotificationRecord>, ApiError> {
  let user = require_user(ctx.identity(), &headers).await?;

  let record = ctx
    .store()
    .mark_read(id, user.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(record))
}
