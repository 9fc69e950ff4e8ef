//! Forward-to-next stage
//!
//! The dispatcher hands its result to exactly one following stage and
//! returns whatever that stage returns.

use std::sync::Arc;

use super::context::{Request, Response};
use super::handler::BoxFuture;
use crate::error::BoxError;

/// How the dispatcher finished with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one action was invoked
    Handled { actions: usize },
    /// No template matched, or none of the matches had a compatible action
    NotFound,
}

impl Outcome {
    pub const fn actions(self) -> usize {
        match self {
            Self::Handled { actions } => actions,
            Self::NotFound => 0,
        }
    }
}

/// Request, response and outcome handed to the next stage
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request: Arc<Request>,
    pub response: Response,
    pub outcome: Outcome,
}

/// Stage that runs after the dispatcher
pub trait Next: Send + Sync {
    fn run(&self, exchange: Exchange) -> BoxFuture<'_, Result<Response, BoxError>>;
}

/// Last stage: returns the response unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal;

impl Next for Terminal {
    fn run(&self, exchange: Exchange) -> BoxFuture<'_, Result<Response, BoxError>> {
        Box::pin(async move { Ok(exchange.response) })
    }
}
