// Server module entry point
// Listener creation, connection serving and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is renamed
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::start_signal_handler;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::controllers;
    use crate::handler::AppState;
    use crate::routing::RouteRegistry;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_serves_routed_request_and_stops() {
        let config = Config::load_from("does/not/exist/router").unwrap();
        let mut registry = RouteRegistry::default();
        controllers::register_all(&mut registry).unwrap();
        let state = Arc::new(AppState::new(config, registry));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(listener, state, Arc::clone(&shutdown)));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /photos/7 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();

        assert!(raw.starts_with("HTTP/1.1 200 OK"), "got: {raw}");
        assert!(raw.contains(r#""id":"7""#));

        shutdown.notify_one();
        server.await.unwrap().unwrap();
    }
}
