//! Collaborator traits — the narrow interfaces through which the core talks
//! to hosted services (weather data, space-weather data, email, identity).
//!
//! Implementations live in `nimbus-providers`; the alert engine and the API
//! layer depend only on these traits, which is what lets tests substitute
//! in-memory fakes.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::snapshot::{EventType, SpaceWeatherEvent, WeatherSnapshot};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// An upstream service was unavailable or answered with a failure.
///
/// Inside a scan pass these are isolated to the single rule/city being
/// processed: logged, counted, never raised to the caller of the pass.
#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("{provider} returned status {status}: {message}")]
  Status {
    provider: &'static str,
    status: u16,
    message: String,
  },

  #[error("{provider} unreachable: {message}")]
  Unreachable {
    provider: &'static str,
    message: String,
  },

  #[error("unexpected payload from {provider}: {message}")]
  Payload {
    provider: &'static str,
    message: String,
  },
}

/// Failure to resolve a bearer credential.
#[derive(Debug, Error)]
pub enum IdentityError {
  #[error("unauthorized")]
  Unauthorized,

  #[error(transparent)]
  Provider(#[from] ProviderError),
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// The resolved caller behind a bearer credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
  pub user_id: Uuid,
  pub email: String,
}

/// Resolves bearer credentials against the hosted identity provider.
pub trait Identity: Send + Sync {
  fn resolve<'a>(
    &'a self,
    bearer: &'a str,
  ) -> impl Future<Output = Result<AuthUser, IdentityError>> + Send + 'a;
}

/// Privileged user-id → email lookup, used by the dispatcher when a
/// triggered alert should also go out by email. `None` when the identity
/// provider has no such user.
pub trait Directory: Send + Sync {
  fn email_for(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<String>, ProviderError>> + Send + '_;
}

// ─── Data providers ──────────────────────────────────────────────────────────

/// Where a current-conditions lookup is keyed.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
  City(String),
  Coords { lat: f64, lon: f64 },
}

/// Fetches current weather for one location. The underlying provider key is
/// held by the implementation and never exposed to callers.
pub trait WeatherProvider: Send + Sync {
  fn fetch_current<'a>(
    &'a self,
    location: &'a Location,
  ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send + 'a;
}

/// Fetches space-weather events from the provider's notification feed.
///
/// `event_type: None` means all types. Dates are typed, so malformed input
/// is rejected at the API boundary before this trait is ever reached.
pub trait SpaceWeatherProvider: Send + Sync {
  fn fetch_events(
    &self,
    event_type: Option<EventType>,
    start: NaiveDate,
    end: NaiveDate,
  ) -> impl Future<Output = Result<Vec<SpaceWeatherEvent>, ProviderError>> + Send + '_;
}

// ─── Email ───────────────────────────────────────────────────────────────────

/// Provider-assigned id of an accepted outbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Sends one transactional email. No retry: failures are reported to the
/// caller, which records them and moves on.
pub trait Mailer: Send + Sync {
  fn send<'a>(
    &'a self,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
  ) -> impl Future<Output = Result<MessageId, ProviderError>> + Send + 'a;
}
