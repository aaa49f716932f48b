//! HTTP clients for the hosted services nimbus talks to: OpenWeatherMap for
//! current conditions, NASA DONKI for space-weather notifications, Resend for
//! transactional email, and a GoTrue-style identity endpoint for resolving
//! bearer tokens.
//!
//! Each client implements the matching trait from [`nimbus_core::provider`]
//! and holds its API key privately. Keys go into outbound requests only;
//! they never appear in errors, logs, or responses.

mod http;

pub mod donki;
pub mod identity;
pub mod resend;
pub mod weather;

pub use donki::DonkiClient;
pub use http::default_client;
pub use identity::{GoTrueDirectory, GoTrueIdentity};
pub use resend::ResendMailer;
pub use weather::OpenWeatherClient;
