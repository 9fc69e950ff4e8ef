//! URL-template router
//!
//! Matches a request path and method against registered templates such as
//! `/photos/<id>` and dispatches to handler actions declared per verb and
//! placeholder names.
//!
//! ```
//! use std::sync::Arc;
//! use template_router::routing::{
//!     ActionTable, BoxFuture, Controller, Dispatcher, HandlerContext, HandlerResult, Params,
//!     Request, RouteRegistry, Terminal,
//! };
//!
//! struct Photos {
//!     ctx: HandlerContext,
//! }
//!
//! impl Photos {
//!     fn get(&mut self, params: Params) -> BoxFuture<'_, HandlerResult> {
//!         Box::pin(async move {
//!             let id = params.get("id").unwrap_or_default();
//!             self.ctx.response().set_body(format!("photo {id}"));
//!             Ok(())
//!         })
//!     }
//! }
//!
//! impl Controller for Photos {
//!     fn new(ctx: HandlerContext) -> Self {
//!         Self { ctx }
//!     }
//!
//!     fn actions(table: &mut ActionTable<Self>) {
//!         table.on("Get", &["id"], Self::get);
//!     }
//! }
//!
//! let mut registry = RouteRegistry::default();
//! registry.register::<Photos>("/photos/<id>").unwrap();
//! let dispatcher = Dispatcher::new(Arc::new(registry), Terminal);
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let response = runtime
//!     .block_on(dispatcher.handle(Request::new("GET", "/photos/42")))
//!     .unwrap();
//! assert_eq!(response.body, b"photo 42");
//! ```

pub mod config;
pub mod controllers;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use error::{BoxError, RoutingError};
