//! Route registry
//!
//! Registrations live in an append-only list; list order is registration
//! order and is the order in which matches are returned. Pattern keys are
//! tracked separately to reject duplicates.

use std::collections::HashSet;
use std::sync::Arc;

use super::handler::{Controller, ControllerTarget, RouteTarget};
use super::pattern::{compile, CompiledPattern};
use super::segment::{parse_template, Contract};
use crate::error::RoutingError;
use crate::logger::{RouteLog, TracingLog};

/// One registered template
pub struct Registration {
    template: String,
    pattern: CompiledPattern,
    contract: Contract,
    target: Box<dyn RouteTarget>,
}

impl Registration {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub const fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub const fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn target(&self) -> &dyn RouteTarget {
        self.target.as_ref()
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("template", &self.template)
            .field("pattern", &self.pattern.as_str())
            .field("handler", &self.target.handler_name())
            .finish_non_exhaustive()
    }
}

/// Registered routes, built once at startup and read-only afterwards
pub struct RouteRegistry {
    routes: Vec<Registration>,
    keys: HashSet<String>,
    log: Arc<dyn RouteLog>,
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new(Arc::new(TracingLog))
    }
}

impl RouteRegistry {
    pub fn new(log: Arc<dyn RouteLog>) -> Self {
        Self {
            routes: Vec::new(),
            keys: HashSet::new(),
            log,
        }
    }

    /// Register `template` for handler `H`.
    pub fn register<H: Controller>(&mut self, template: &str) -> Result<&Contract, RoutingError> {
        let contract = parse_template(template);
        let pattern = compile(template, &contract)?;

        if self.keys.contains(pattern.as_str()) {
            return Err(RoutingError::DuplicateRoute {
                template: template.to_string(),
                pattern: pattern.as_str().to_string(),
            });
        }

        let target = ControllerTarget::<H>::build()?;
        self.log
            .route_registered(template, pattern.as_str(), target.handler_name());

        self.keys.insert(pattern.as_str().to_string());
        self.routes.push(Registration {
            template: template.to_string(),
            pattern,
            contract,
            target: Box::new(target),
        });

        let added = self.routes.len() - 1;
        Ok(&self.routes[added].contract)
    }

    /// Every registration whose pattern matches `path`, in registration order.
    pub fn lookup(&self, path: &str) -> Vec<&Registration> {
        self.routes
            .iter()
            .filter(|r| r.pattern.is_match(path))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub(crate) fn log(&self) -> &Arc<dyn RouteLog> {
        &self.log
    }
}
