use std::sync::Arc;
use tokio::sync::Notify;

use template_router::config::{self, Config};
use template_router::handler::AppState;
use template_router::routing::RouteRegistry;
use template_router::{controllers, logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging).map_err(|e| -> Box<dyn std::error::Error> { e })?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::info!("Using {workers} worker threads");
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Registration happens once, before any request is accepted
    let mut registry = RouteRegistry::default();
    controllers::register_all(&mut registry)?;
    tracing::info!(routes = registry.len(), "routes registered");
    for route in registry.iter() {
        tracing::debug!(template = route.template(), pattern = route.pattern().as_str());
    }

    let listener = server::create_listener(addr)?;
    let state = Arc::new(AppState::new(cfg, registry));

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    tracing::info!("Listening on: http://{addr}");
    server::start_server_loop(listener, state, shutdown).await?;
    tracing::info!("Server stopped");
    Ok(())
}
