//! `cashdesk-observability` — process-wide logging/tracing setup.

pub mod tracing;

pub use tracing::init;
