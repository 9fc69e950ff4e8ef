//! Error types
//!
//! Registration failures are fatal at startup. Handler failures travel as a
//! boxed error and are never wrapped by the dispatcher.

/// Error produced by a handler action or a pipeline stage.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while building the route registry.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The compiled pattern of a new template is already registered.
    ///
    /// Two templates that differ only in placeholder names compile to the
    /// same pattern and collide here.
    #[error("route {template:?} compiles to {pattern:?}, which is already registered")]
    DuplicateRoute { template: String, pattern: String },

    /// The regex engine rejected a compiled pattern.
    #[error("route {template:?} produced an invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        template: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A handler declared the same verb and parameter list twice.
    #[error("handler {handler} declares {verb}({params}) more than once")]
    DuplicateAction {
        handler: &'static str,
        verb: String,
        params: String,
    },

    /// A handler declared an action with an empty verb.
    #[error("handler {handler} declares an action without a verb")]
    EmptyVerb { handler: &'static str },
}
