//! Route handlers, one module per resource.

pub mod alerts;
pub mod check;
pub mod notifications;
pub mod preferences;
pub mod space;
pub mod weather;
