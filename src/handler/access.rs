//! Access log stage
//!
//! Runs after the dispatcher and writes one access log line per request.

use crate::config::LoggingConfig;
use crate::error::BoxError;
use crate::logger::AccessLogEntry;
use crate::routing::{BoxFuture, Exchange, Next, Response};

#[derive(Debug, Clone)]
pub struct AccessLog {
    enabled: bool,
    format: String,
}

impl AccessLog {
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.access_log,
            format: config.access_log_format.clone(),
        }
    }

    pub fn entry(exchange: &Exchange) -> AccessLogEntry {
        let request = &exchange.request;
        let mut entry =
            AccessLogEntry::new(request.trace_id, request.method.clone(), request.path.clone());
        if let Some(peer) = request.peer {
            entry.remote_addr = peer.ip().to_string();
        }
        entry.status = exchange.response.status;
        entry.body_bytes = exchange.response.body.len();
        entry.handlers = exchange.outcome.actions();
        entry.request_time_us =
            u64::try_from(request.received_at.elapsed().as_micros()).unwrap_or(u64::MAX);
        entry
    }
}

impl Next for AccessLog {
    fn run(&self, exchange: Exchange) -> BoxFuture<'_, Result<Response, BoxError>> {
        Box::pin(async move {
            if self.enabled {
                let line = Self::entry(&exchange).format(&self.format);
                tracing::info!(target: "access", "{line}");
            }
            Ok(exchange.response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Outcome, Request};
    use std::sync::Arc;

    fn exchange() -> Exchange {
        let request = Request::new("GET", "/photos/42").with_peer("10.0.0.1:5000".parse().unwrap());
        let mut response = Response::default();
        response.body = b"photo".to_vec();
        Exchange {
            request: Arc::new(request),
            response,
            outcome: Outcome::Handled { actions: 2 },
        }
    }

    #[test]
    fn test_entry_from_exchange() {
        let entry = AccessLog::entry(&exchange());
        assert_eq!(entry.remote_addr, "10.0.0.1");
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.path, "/photos/42");
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_bytes, 5);
        assert_eq!(entry.handlers, 2);
    }

    #[tokio::test]
    async fn test_stage_returns_response_unchanged() {
        let config = LoggingConfig {
            level: "info".to_string(),
            access_log: true,
            access_log_format: "json".to_string(),
            log_file: None,
        };
        let exchange = exchange();
        let expected = exchange.response.clone();

        let response = AccessLog::new(&config).run(exchange).await.unwrap();
        assert_eq!(response, expected);
    }
}
