//! Alert scanning and notification dispatch.
//!
//! [`AlertEngine`] is the heart of the service: it takes fresh provider
//! snapshots, evaluates them against stored rules, and dispatches
//! notifications — one history record per trigger, plus an email when the
//! owner opted in. [`NotificationLog`] is the single origination point for
//! new-record events and exposes them as a broadcast subscription.

mod engine;
mod feed;
mod message;
mod report;

pub mod error;

pub use engine::AlertEngine;
pub use error::{Error, Result};
pub use feed::NotificationLog;
pub use report::{
  PhaseReport, RunReport, ScanOutcome, SpaceSummary, WeatherSummary,
};
