//! Request routing entry module
//!
//! Entry point for HTTP request processing: adapts the hyper request, runs the
//! dispatcher pipeline and renders the result.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use super::access::AccessLog;
use crate::config::{Config, HttpConfig};
use crate::http;
use crate::routing::{self, Dispatcher, RouteRegistry};

/// Shared state for all connections
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher<AccessLog>,
}

impl AppState {
    /// Freeze the registry and build the pipeline.
    pub fn new(config: Config, registry: RouteRegistry) -> Self {
        let access_log = AccessLog::new(&config.logging);
        Self {
            dispatcher: Dispatcher::new(Arc::new(registry), access_log),
            config,
        }
    }

    pub const fn http(&self) -> &HttpConfig {
        &self.config.http
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    peer: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let request = routing::Request::new(req.method().as_str(), req.uri().path()).with_peer(peer);
    let trace_id = request.trace_id;

    match state.dispatcher.handle(request).await {
        Ok(routed) => Ok(http::build_routed_response(routed, state.http())),
        Err(err) => {
            tracing::error!(trace_id, error = %err, "handler failed");
            Ok(http::build_500_response())
        }
    }
}
