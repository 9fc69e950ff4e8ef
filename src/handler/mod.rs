//! Request handler module
//!
//! Responsible for adapting HTTP requests to the router and rendering its
//! responses, plus the access log stage that follows the dispatcher.

pub mod access;
pub mod router;

// Re-export main entry point
pub use router::{handle_request, AppState};
