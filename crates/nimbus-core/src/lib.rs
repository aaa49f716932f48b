//! Core types and trait definitions for the nimbus alert service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod evaluate;
pub mod history;
pub mod preferences;
pub mod provider;
pub mod rule;
pub mod severity;
pub mod snapshot;
pub mod store;

pub use error::{Error, Result};
