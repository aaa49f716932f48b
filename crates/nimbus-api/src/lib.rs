//! JSON REST API for nimbus.
//!
//! Exposes an axum [`Router`] over one store (implementing all three
//! nimbus-core store traits) plus the four external collaborators. Handlers
//! are generic over [`AppContext`], which is what lets the tests swap every
//! collaborator for an in-process stub.

pub mod auth;
pub mod error;
pub mod handlers;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use nimbus_alerts::AlertEngine;
use nimbus_core::{
  provider::{
    Directory, Identity, Mailer, SpaceWeatherProvider, WeatherProvider,
  },
  store::{AlertRuleStore, HistoryStore, PreferenceStore},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

fn default_openweather_url() -> String {
  "https://api.openweathermap.org".to_string()
}
fn default_donki_url() -> String { "https://api.nasa.gov".to_string() }
fn default_resend_url() -> String { "https://api.resend.com".to_string() }

/// Runtime server configuration, deserialised from `config.toml` with
/// `NIMBUS_`-prefixed environment overrides. Secrets are read here and flow
/// only into provider clients; they are never logged or echoed.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  pub database_path: PathBuf,

  /// Shared secret expected by `POST /api/check`.
  pub cron_secret: String,

  pub openweather_api_key: String,
  #[serde(default = "default_openweather_url")]
  pub openweather_base_url: String,

  pub nasa_api_key: String,
  #[serde(default = "default_donki_url")]
  pub donki_base_url: String,

  pub resend_api_key: String,
  #[serde(default = "default_resend_url")]
  pub resend_base_url: String,
  /// Full sender spec, e.g. `Nimbus Alerts <alerts@example.com>`.
  pub email_from: String,

  pub identity_base_url: String,
  pub identity_anon_key: String,
  pub identity_service_key: String,
}

// ─── Application context ─────────────────────────────────────────────────────

/// One store type implementing all three store traits.
pub trait AppStore:
  PreferenceStore
  + AlertRuleStore
  + HistoryStore
  + Clone
  + Send
  + Sync
  + 'static
{
}

impl<T> AppStore for T where
  T: PreferenceStore
    + AlertRuleStore
    + HistoryStore
    + Clone
    + Send
    + Sync
    + 'static
{
}

/// Everything a handler can reach: the store, the collaborators, the alert
/// engine, and the cron secret.
pub trait AppContext: Clone + Send + Sync + 'static {
  type Store: AppStore;
  type Identity: Identity + 'static;
  type Weather: WeatherProvider + 'static;
  type Space: SpaceWeatherProvider + 'static;
  type Mailer: Mailer + 'static;
  type Directory: Directory + 'static;

  fn store(&self) -> &Self::Store;
  fn identity(&self) -> &Self::Identity;
  fn weather(&self) -> &Self::Weather;
  fn space(&self) -> &Self::Space;
  fn engine(&self) -> &AlertEngine<Self::Store, Self::Mailer, Self::Directory>;
  fn cron_secret(&self) -> &str;
}

/// Production [`AppContext`]: one store plus the four hosted collaborators.
pub struct AppState<S, I, W, P, M, D> {
  store:       S,
  identity:    Arc<I>,
  weather:     Arc<W>,
  space:       Arc<P>,
  engine:      Arc<AlertEngine<S, M, D>>,
  cron_secret: Arc<str>,
}

impl<S, I, W, P, M, D> AppState<S, I, W, P, M, D>
where
  S: AppStore,
  M: Mailer,
  D: Directory,
{
  pub fn new(
    store: S,
    identity: I,
    weather: W,
    space: P,
    mailer: M,
    directory: D,
    cron_secret: &str,
  ) -> Self {
    let engine = AlertEngine::new(store.clone(), mailer, directory);
    Self {
      store,
      identity: Arc::new(identity),
      weather: Arc::new(weather),
      space: Arc::new(space),
      engine: Arc::new(engine),
      cron_secret: Arc::from(cron_secret),
    }
  }
}

impl<S: Clone, I, W, P, M, D> Clone for AppState<S, I, W, P, M, D> {
  fn clone(&self) -> Self {
    Self {
      store:       self.store.clone(),
      identity:    Arc::clone(&self.identity),
      weather:     Arc::clone(&self.weather),
      space:       Arc::clone(&self.space),
      engine:      Arc::clone(&self.engine),
      cron_secret: Arc::clone(&self.cron_secret),
    }
  }
}

impl<S, I, W, P, M, D> AppContext for AppState<S, I, W, P, M, D>
where
  S: AppStore,
  I: Identity + 'static,
  W: WeatherProvider + 'static,
  P: SpaceWeatherProvider + 'static,
  M: Mailer + 'static,
  D: Directory + 'static,
{
  type Store = S;
  type Identity = I;
  type Weather = W;
  type Space = P;
  type Mailer = M;
  type Directory = D;

  fn store(&self) -> &S { &self.store }
  fn identity(&self) -> &I { &self.identity }
  fn weather(&self) -> &W { &self.weather }
  fn space(&self) -> &P { &self.space }
  fn engine(&self) -> &AlertEngine<S, M, D> { &self.engine }
  fn cron_secret(&self) -> &str { &self.cron_secret }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `ctx`.
pub fn router<C: AppContext>(ctx: C) -> Router {
  Router::new()
    // Provider proxies (no user auth; keys stay server-side)
    .route("/api/weather", get(handlers::weather::current::<C>))
    .route("/api/space-weather", get(handlers::space::events::<C>))
    // Preferences
    .route(
      "/api/preferences",
      get(handlers::preferences::get_own::<C>)
        .put(handlers::preferences::update::<C>),
    )
    // Alert rules
    .route(
      "/api/alerts",
      get(handlers::alerts::list::<C>).post(handlers::alerts::create::<C>),
    )
    .route("/api/alerts/{id}", delete(handlers::alerts::remove::<C>))
    .route("/api/alerts/{id}/toggle", post(handlers::alerts::toggle::<C>))
    // Notification history
    .route("/api/notifications", get(handlers::notifications::list::<C>))
    .route(
      "/api/notifications/{id}/read",
      post(handlers::notifications::mark_read::<C>),
    )
    // Scheduled check
    .route("/api/check", post(handlers::check::run::<C>))
    .layer(TraceLayer::new_for_http())
    .with_state(ctx)
}
