//! Demo controllers served by the binary

pub mod photos;
pub mod process;

use crate::error::RoutingError;
use crate::routing::RouteRegistry;

pub use photos::PhotoController;
pub use process::ProcessController;

/// Register every demo route.
pub fn register_all(registry: &mut RouteRegistry) -> Result<(), RoutingError> {
    registry.register::<PhotoController>(photos::TEMPLATE)?;
    registry.register::<ProcessController>(process::TEMPLATE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Dispatcher, Request, Terminal, NOT_FOUND};
    use std::sync::Arc;

    fn dispatcher() -> Dispatcher<Terminal> {
        let mut registry = RouteRegistry::default();
        register_all(&mut registry).unwrap();
        Dispatcher::new(Arc::new(registry), Terminal)
    }

    #[tokio::test]
    async fn test_photo_lookup() {
        let response = dispatcher()
            .handle(Request::new("GET", "/photos/42"))
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["id"], "42");
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_photo_delete_fails() {
        let err = dispatcher()
            .handle(Request::new("DELETE", "/photos/42"))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<photos::ReadOnly>().is_some());
    }

    #[tokio::test]
    async fn test_process_job() {
        let response = dispatcher()
            .handle(Request::new("POST", "/process/threshold(20)/0,0,10,10/"))
            .await
            .unwrap();
        assert_eq!(response.status, 202);
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["filter"], "threshold(20)");
        assert_eq!(body["rect"]["width"], 10);
    }

    #[tokio::test]
    async fn test_process_rejects_bad_job() {
        let response = dispatcher()
            .handle(Request::new("post", "/process/blur/0,0,10,10"))
            .await
            .unwrap();
        assert_eq!(response.status, 400);
    }

    #[tokio::test]
    async fn test_process_requires_post() {
        let response = dispatcher()
            .handle(Request::new("GET", "/process/sepia/0,0,1,1"))
            .await
            .unwrap();
        assert_eq!(response.status, NOT_FOUND);
    }
}
