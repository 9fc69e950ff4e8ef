//! Handler declarations
//!
//! A handler type lists its actions explicitly: a verb, the ordered parameter
//! names it expects, and the function to call. The table is validated when
//! the route is registered and consulted read-only at request time.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use super::context::HandlerContext;
use crate::error::{BoxError, RoutingError};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of one handler action
pub type HandlerResult = Result<(), BoxError>;

/// Action bound to a handler type.
pub type Action<H> = for<'a> fn(&'a mut H, Params) -> BoxFuture<'a, HandlerResult>;

/// A type whose actions can serve a route.
///
/// A fresh instance is built for every matched request, receiving the request
/// context through [`Controller::new`].
pub trait Controller: Send + Sized + 'static {
    fn new(ctx: HandlerContext) -> Self;

    fn actions(table: &mut ActionTable<Self>);
}

/// Values bound to an action's parameters, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub(crate) const fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values in parameter order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

struct ActionEntry<H> {
    verb: String,
    params: Vec<String>,
    action: Action<H>,
}

/// Declared actions of one handler type, in declaration order.
pub struct ActionTable<H> {
    entries: Vec<ActionEntry<H>>,
}

impl<H> Default for ActionTable<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> ActionTable<H> {
    /// Declare `verb(params...)`.
    pub fn on(&mut self, verb: &str, params: &[&str], action: Action<H>) -> &mut Self {
        self.entries.push(ActionEntry {
            verb: verb.to_string(),
            params: params.iter().map(ToString::to_string).collect(),
            action,
        });
        self
    }

    fn validate(&self, handler: &'static str) -> Result<(), RoutingError> {
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.verb.is_empty() {
                return Err(RoutingError::EmptyVerb { handler });
            }
            let duplicate = self.entries[..i].iter().any(|earlier| {
                earlier.verb.eq_ignore_ascii_case(&entry.verb) && earlier.params == entry.params
            });
            if duplicate {
                return Err(RoutingError::DuplicateAction {
                    handler,
                    verb: entry.verb.clone(),
                    params: entry.params.join(", "),
                });
            }
        }
        Ok(())
    }

    /// First action whose verb equals `method` ignoring case and whose
    /// parameter names equal `placeholders` position by position.
    fn resolve(&self, method: &str, placeholders: &[&str]) -> Option<usize> {
        self.entries.iter().position(|e| {
            e.verb.eq_ignore_ascii_case(method)
                && e.params.len() == placeholders.len()
                && e.params.iter().zip(placeholders).all(|(p, name)| p == name)
        })
    }
}

/// Type-erased handler stored in a registration.
pub trait RouteTarget: Send + Sync {
    fn handler_name(&self) -> &'static str;

    /// Index of the action serving `method` for these placeholder names.
    fn resolve(&self, method: &str, placeholders: &[&str]) -> Option<usize>;

    fn action_verb(&self, index: usize) -> &str;

    /// Parameter names of an action, in declaration order.
    fn action_params(&self, index: usize) -> &[String];

    /// Construct the handler with `ctx` and run the action.
    fn invoke(&self, index: usize, ctx: HandlerContext, params: Params)
        -> BoxFuture<'static, HandlerResult>;
}

pub(crate) struct ControllerTarget<H> {
    table: ActionTable<H>,
    _handler: PhantomData<fn() -> H>,
}

impl<H: Controller> ControllerTarget<H> {
    pub(crate) fn build() -> Result<Self, RoutingError> {
        let mut table = ActionTable::default();
        H::actions(&mut table);
        table.validate(std::any::type_name::<H>())?;
        Ok(Self {
            table,
            _handler: PhantomData,
        })
    }
}

impl<H: Controller> RouteTarget for ControllerTarget<H> {
    fn handler_name(&self) -> &'static str {
        std::any::type_name::<H>()
    }

    fn resolve(&self, method: &str, placeholders: &[&str]) -> Option<usize> {
        self.table.resolve(method, placeholders)
    }

    fn action_verb(&self, index: usize) -> &str {
        &self.table.entries[index].verb
    }

    fn action_params(&self, index: usize) -> &[String] {
        &self.table.entries[index].params
    }

    fn invoke(
        &self,
        index: usize,
        ctx: HandlerContext,
        params: Params,
    ) -> BoxFuture<'static, HandlerResult> {
        let action = self.table.entries[index].action;
        Box::pin(async move {
            let mut handler = H::new(ctx);
            action(&mut handler, params).await
        })
    }
}
