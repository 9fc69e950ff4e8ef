// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::handle_connection;
use crate::handler::AppState;

/// How long in-flight connections get to finish after shutdown
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Accept loop for the routed server
///
/// Returns once `shutdown` is notified and in-flight connections have
/// finished or the drain timeout expired.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let active = Arc::new(AtomicUsize::new(0));
    let access_log = state.config.logging.access_log;

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer)) => {
                        if access_log {
                            tracing::debug!(%peer, "connection accepted");
                        }
                        handle_connection(stream, peer, Arc::clone(&state), Arc::clone(&active));
                    }
                    Err(e) => tracing::error!("Failed to accept connection: {e}"),
                }
            }

            () = shutdown.notified() => {
                tracing::info!("shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    drop(listener);
    drain(&active).await;
    Ok(())
}

/// Wait for active connections to reach zero, bounded by `DRAIN_TIMEOUT`.
async fn drain(active: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    while active.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!(
                remaining = active.load(Ordering::SeqCst),
                "drain timeout reached, closing with connections still open"
            );
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    tracing::info!("all connections closed");
}
