//! Logger module
//!
//! Provides logging utilities for the router including:
//! - The trace sink injected into the registry and dispatcher
//! - Subscriber setup from configuration
//! - Access log formatting

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Observational sink for routing events. Never affects control flow.
pub trait RouteLog: Send + Sync {
    fn route_registered(&self, template: &str, pattern: &str, handler: &str);

    fn action_resolved(&self, trace_id: u64, handler: &str, verb: &str);
}

/// Sink emitting `tracing` events at trace level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl RouteLog for TracingLog {
    fn route_registered(&self, template: &str, pattern: &str, handler: &str) {
        tracing::trace!(template, pattern, handler, "route registered");
    }

    fn action_resolved(&self, trace_id: u64, handler: &str, verb: &str) {
        tracing::trace!(trace_id, handler, verb, "handling request");
    }
}

/// Install the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` overrides the
/// configured level.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let to_file = config.log_file.is_some();
    let writer = writer::make_writer(config.log_file.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(!to_file)
        .try_init()
}
