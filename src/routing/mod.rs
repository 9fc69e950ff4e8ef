//! Routing module
//!
//! URL-template routing:
//! - Template tokenizing and classification into static/dynamic segments
//! - Compilation to anchored patterns
//! - Ordered route registry with duplicate detection
//! - Dispatch by verb and placeholder names

pub mod context;
pub mod dispatch;
pub mod handler;
pub mod pattern;
pub mod pipeline;
pub mod registry;
pub mod segment;

pub use context::{HandlerContext, Request, Response, ResponseHandle};
pub use dispatch::{Dispatcher, NOT_FOUND};
pub use handler::{ActionTable, BoxFuture, Controller, HandlerResult, Params, RouteTarget};
pub use pattern::CompiledPattern;
pub use pipeline::{Exchange, Next, Outcome, Terminal};
pub use registry::{Registration, RouteRegistry};
pub use segment::{classify, parse_template, tokenize, Contract, Segment, SegmentKind};
