//! Access log format module
//!
//! Supports three formats:
//! - `combined` (common plus the handlers that ran and the elapsed time)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)

use chrono::{DateTime, Local};
use serde::Serialize;

/// One routed request, as written to the access log
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    /// Client address, `-` when unknown
    pub remote_addr: String,
    #[serde(serialize_with = "serialize_time")]
    pub time: DateTime<Local>,
    pub trace_id: u64,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub body_bytes: usize,
    /// Number of handler actions invoked for the request
    pub handlers: usize,
    pub request_time_us: u64,
}

fn serialize_time<S: serde::Serializer>(
    time: &DateTime<Local>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.to_rfc3339())
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(trace_id: u64, method: String, path: String) -> Self {
        Self {
            remote_addr: "-".to_string(),
            time: Local::now(),
            trace_id,
            method,
            path,
            status: 200,
            body_bytes: 0,
            handlers: 0,
            request_time_us: 0,
        }
    }

    /// Format the entry; unknown format names fall back to `combined`.
    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            "json" => self.format_json(),
            _ => self.format_combined(),
        }
    }

    /// `$remote_addr - - [$time_local] "$method $path" $status $body_bytes`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }

    fn format_combined(&self) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;
        format!(
            "{} #{} handlers={} {request_time:.3}s",
            self.format_common(),
            self.trace_id,
            self.handlers,
        )
    }

    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"error":"{e}"}}"#))
    }
}
