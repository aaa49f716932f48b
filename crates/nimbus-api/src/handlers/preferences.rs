//! `/api/preferences` — per-user preference record.

use axum::{Json, extract::State, http::HeaderMap};
use nimbus_core::{
  preferences::{PreferencesUpdate, UserPreferences},
  store::PreferenceStore,
};

use crate::{AppContext, auth::require_user, error::ApiError};

/// `GET /api/preferences` — creates the record with defaults on first read.
pub async fn get_own<C: AppContext>(
  State(ctx): State<C>,
  headers: HeaderMap,
) -> Result<Json<UserPreferences>, ApiError> {
  let user = require_user(ctx.identity(), &headers).await?;

  let prefs = match ctx
    .store()
    .get_preferences(user.user_id)
    .await
    .map_err(ApiError::store)?
  {
    Some(prefs) => prefs,
    None => ctx
      .store()
      .upsert_preferences(user.user_id, PreferencesUpdate::default())
      .await
      .map_err(ApiError::store)?,
  };
  Ok(Json(prefs))
}

/// `PUT /api/preferences` — partial update; omitted fields stay untouched.
pub async fn update<C: AppContext>(
  State(ctx): State<C>,
  headers: HeaderMap,
  Json(body): Json<PreferencesUpdate>,
) -> Result<Json<UserPreferences>, ApiError> {
  let user = require_user(ctx.identity(), &headers).await?;

  let prefs = ctx
    .store()
    .upsert_preferences(user.user_id, body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(prefs))
}
