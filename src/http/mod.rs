//! HTTP protocol layer module
//!
//! Converts between hyper's types and the router's transport-free request and
//! response types.

pub mod response;

pub use response::{build_500_response, build_routed_response};
