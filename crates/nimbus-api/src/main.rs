//! nimbus server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, wires up the hosted providers, and serves the
//! JSON API over HTTP.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use nimbus_api::{AppState, ServerConfig};
use nimbus_providers::{
  DonkiClient, GoTrueDirectory, GoTrueIdentity, OpenWeatherClient,
  ResendMailer, default_client,
};
use nimbus_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Nimbus weather-alert server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("NIMBUS"))
    .build()
    .context("failed to read config file")?;

  let cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open SQLite store.
  let store = SqliteStore::open(&cfg.database_path).await.with_context(|| {
    format!("failed to open store at {:?}", cfg.database_path)
  })?;

  // One pooled HTTP client shared across every provider.
  let http = default_client().context("failed to build http client")?;

  let weather = OpenWeatherClient::new(
    http.clone(),
    &cfg.openweather_base_url,
    &cfg.openweather_api_key,
  );
  let space =
    DonkiClient::new(http.clone(), &cfg.donki_base_url, &cfg.nasa_api_key);
  let mailer = ResendMailer::new(
    http.clone(),
    &cfg.resend_base_url,
    &cfg.resend_api_key,
    &cfg.email_from,
  );
  let identity = GoTrueIdentity::new(
    http.clone(),
    &cfg.identity_base_url,
    &cfg.identity_anon_key,
  );
  let directory = GoTrueDirectory::new(
    http,
    &cfg.identity_base_url,
    &cfg.identity_service_key,
  );

  let state = AppState::new(
    store,
    identity,
    weather,
    space,
    mailer,
    directory,
    &cfg.cron_secret,
  );

  let app = nimbus_api::router(state);
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
