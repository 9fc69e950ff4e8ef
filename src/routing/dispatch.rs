//! Request dispatcher
//!
//! For each registration matching the path, in registration order: resolve
//! an action for the request method, bind the dynamic path tokens, construct
//! the handler with the request context and await the action. Matches never
//! run concurrently. The result is always forwarded to the next stage unless
//! an action fails, in which case the error is returned as is.

use std::sync::Arc;

use super::context::{HandlerContext, Request, Response, ResponseHandle};
use super::handler::Params;
use super::pipeline::{Exchange, Next, Outcome};
use super::registry::{Registration, RouteRegistry};
use super::segment::tokenize;
use crate::error::BoxError;

/// Status written when no action was resolved
pub const NOT_FOUND: u16 = 404;

pub struct Dispatcher<N> {
    registry: Arc<RouteRegistry>,
    next: N,
}

impl<N: Next> Dispatcher<N> {
    pub const fn new(registry: Arc<RouteRegistry>, next: N) -> Self {
        Self { registry, next }
    }

    /// Dispatch one request and forward the result to the next stage.
    pub async fn handle(&self, request: Request) -> Result<Response, BoxError> {
        let request = Arc::new(request);
        let response = ResponseHandle::default();
        let mut invoked = 0;

        for registration in self.registry.lookup(&request.path) {
            let Some((index, params)) = resolve(registration, &request) else {
                continue;
            };

            let target = registration.target();
            self.registry.log().action_resolved(
                request.trace_id,
                target.handler_name(),
                target.action_verb(index),
            );

            let ctx = HandlerContext::new(Arc::clone(&request), response.clone());
            target.invoke(index, ctx, params).await?;
            invoked += 1;
        }

        let outcome = if invoked == 0 {
            response.set_status(NOT_FOUND);
            Outcome::NotFound
        } else {
            Outcome::Handled { actions: invoked }
        };

        let exchange = Exchange {
            request,
            response: response.take(),
            outcome,
        };
        self.next.run(exchange).await
    }
}

/// Resolve the action for `request` on one matched registration and bind its
/// parameters.
fn resolve(registration: &Registration, request: &Request) -> Option<(usize, Params)> {
    let contract = registration.contract();
    let placeholders: Vec<&str> = contract.placeholders().collect();
    let target = registration.target();
    let index = target.resolve(&request.method, &placeholders)?;

    let tokens = tokenize(&request.path);
    let mut entries = Vec::with_capacity(placeholders.len());
    for (name, position) in target
        .action_params(index)
        .iter()
        .zip(contract.dynamic_positions())
    {
        let Some(value) = tokens.get(position) else {
            tracing::warn!(
                path = %request.path,
                template = registration.template(),
                "path tokens do not line up with the matched template"
            );
            return None;
        };
        entries.push((name.clone(), (*value).to_string()));
    }

    Some((index, Params::new(entries)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::testing::MemoryLog;
    use crate::routing::handler::{ActionTable, BoxFuture, Controller, HandlerResult};
    use crate::routing::Terminal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // Calls are recorded in a process-wide list, so each test filters by its
    // own trace id.
    static CALLS: Mutex<Vec<(u64, String)>> = Mutex::new(Vec::new());

    fn record(ctx: &HandlerContext, call: String) {
        CALLS.lock().unwrap().push((ctx.request().trace_id, call));
    }

    fn calls_for(trace_id: u64) -> Vec<String> {
        CALLS
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == trace_id)
            .map(|(_, c)| c.clone())
            .collect()
    }

    struct PhotoController {
        ctx: HandlerContext,
    }

    impl PhotoController {
        fn get(&mut self, params: Params) -> BoxFuture<'_, HandlerResult> {
            Box::pin(async move {
                let id = params.get("id").unwrap_or_default();
                record(&self.ctx, format!("Photo.Get({id})"));
                self.ctx.response().set_body(format!("photo {id}"));
                Ok(())
            })
        }
    }

    impl Controller for PhotoController {
        fn new(ctx: HandlerContext) -> Self {
            Self { ctx }
        }

        fn actions(table: &mut ActionTable<Self>) {
            table.on("Get", &["id"], Self::get);
        }
    }

    struct ItemsById {
        ctx: HandlerContext,
    }

    impl ItemsById {
        fn get(&mut self, params: Params) -> BoxFuture<'_, HandlerResult> {
            Box::pin(async move {
                record(&self.ctx, format!("A.Get({})", params.get("id").unwrap_or_default()));
                self.ctx.response().set_status(201);
                self.ctx.response().set_header("X-Handler", "A");
                Ok(())
            })
        }
    }

    impl Controller for ItemsById {
        fn new(ctx: HandlerContext) -> Self {
            Self { ctx }
        }

        fn actions(table: &mut ActionTable<Self>) {
            table.on("Get", &["id"], Self::get);
        }
    }

    struct ByKind {
        ctx: HandlerContext,
    }

    impl ByKind {
        fn get(&mut self, params: Params) -> BoxFuture<'_, HandlerResult> {
            Box::pin(async move {
                // yield so this handler would be overtaken if matches ran concurrently
                tokio::task::yield_now().await;
                record(
                    &self.ctx,
                    format!("B.Get({})", params.get("kind").unwrap_or_default()),
                );
                self.ctx.response().set_header("X-Handler", "B");
                Ok(())
            })
        }
    }

    impl Controller for ByKind {
        fn new(ctx: HandlerContext) -> Self {
            Self { ctx }
        }

        fn actions(table: &mut ActionTable<Self>) {
            table.on("Get", &["kind"], Self::get);
        }
    }

    struct UsersController;

    impl UsersController {
        fn post(&mut self, _params: Params) -> BoxFuture<'_, HandlerResult> {
            Box::pin(async { Ok(()) })
        }
    }

    impl Controller for UsersController {
        fn new(_ctx: HandlerContext) -> Self {
            Self
        }

        fn actions(table: &mut ActionTable<Self>) {
            table.on("Post", &["id"], Self::post);
        }
    }

    struct Nested {
        ctx: HandlerContext,
    }

    impl Nested {
        fn get(&mut self, params: Params) -> BoxFuture<'_, HandlerResult> {
            Box::pin(async move {
                let values: Vec<&str> = params.values().collect();
                record(&self.ctx, format!("Nested.Get({})", values.join(",")));
                Ok(())
            })
        }
    }

    impl Controller for Nested {
        fn new(ctx: HandlerContext) -> Self {
            Self { ctx }
        }

        fn actions(table: &mut ActionTable<Self>) {
            table.on("get", &["user", "post"], Self::get);
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    struct Failing;

    impl Failing {
        fn get(&mut self, _params: Params) -> BoxFuture<'_, HandlerResult> {
            Box::pin(async {
                let err: BoxError = Boom.into();
                Err(err)
            })
        }
    }

    impl Controller for Failing {
        fn new(_ctx: HandlerContext) -> Self {
            Self
        }

        fn actions(table: &mut ActionTable<Self>) {
            table.on("Get", &[], Self::get);
        }
    }

    /// Next stage that counts how often it ran
    #[derive(Default)]
    struct CountingNext {
        runs: AtomicUsize,
    }

    impl Next for &CountingNext {
        fn run(&self, exchange: Exchange) -> BoxFuture<'_, Result<Response, BoxError>> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok(exchange.response) })
        }
    }

    fn dispatcher() -> Dispatcher<Terminal> {
        let mut registry = RouteRegistry::default();
        registry.register::<PhotoController>("/photos/<id>").unwrap();
        registry.register::<ItemsById>("/items/<id>").unwrap();
        registry.register::<UsersController>("/users/<id>").unwrap();
        registry
            .register::<Nested>("/users/<user>/posts/<post>")
            .unwrap();
        registry.register::<Failing>("/fail").unwrap();
        Dispatcher::new(Arc::new(registry), Terminal)
    }

    #[tokio::test]
    async fn test_photo_get_invoked_with_id() {
        let request = Request::new("GET", "/photos/42");
        let trace_id = request.trace_id;
        let response = dispatcher().handle(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"photo 42");
        assert_eq!(calls_for(trace_id), vec!["Photo.Get(42)"]);
    }

    #[tokio::test]
    async fn test_missing_segment_is_not_found() {
        let request = Request::new("GET", "/photos");
        let trace_id = request.trace_id;
        let response = dispatcher().handle(request).await.unwrap();

        assert_eq!(response.status, NOT_FOUND);
        assert!(calls_for(trace_id).is_empty());
    }

    #[tokio::test]
    async fn test_no_compatible_action_is_not_found() {
        let response = dispatcher()
            .handle(Request::new("GET", "/users/7"))
            .await
            .unwrap();
        assert_eq!(response.status, NOT_FOUND);

        let response = dispatcher()
            .handle(Request::new("POST", "/users/7"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = dispatcher()
            .handle(Request::new("GET", "/nope"))
            .await
            .unwrap();
        assert_eq!(response.status, NOT_FOUND);
    }

    #[tokio::test]
    async fn test_verb_is_case_insensitive() {
        let dispatcher = dispatcher();
        for verb in ["GET", "get", "GeT"] {
            let request = Request::new(verb, "/photos/1");
            let trace_id = request.trace_id;
            let response = dispatcher.handle(request).await.unwrap();
            assert_eq!(response.status, 200, "verb {verb}");
            assert_eq!(calls_for(trace_id), vec!["Photo.Get(1)"]);
        }
    }

    #[tokio::test]
    async fn test_trailing_slash_is_equivalent() {
        let dispatcher = dispatcher();
        let plain = dispatcher.handle(Request::new("GET", "/photos/9")).await.unwrap();
        let slashed = dispatcher
            .handle(Request::new("GET", "/photos/9/"))
            .await
            .unwrap();
        assert_eq!(plain, slashed);
    }

    #[tokio::test]
    async fn test_static_segments_are_case_sensitive() {
        let response = dispatcher()
            .handle(Request::new("GET", "/Photos/1"))
            .await
            .unwrap();
        assert_eq!(response.status, NOT_FOUND);
    }

    #[tokio::test]
    async fn test_values_bound_left_to_right() {
        let request = Request::new("GET", "/users/ann/posts/12");
        let trace_id = request.trace_id;
        dispatcher().handle(request).await.unwrap();
        assert_eq!(calls_for(trace_id), vec!["Nested.Get(ann,12)"]);
    }

    #[tokio::test]
    async fn test_overlapping_templates_all_fire_in_order() {
        let mut registry = RouteRegistry::default();
        registry.register::<ByKind>("/<kind>/5").unwrap();
        registry.register::<ItemsById>("/items/<id>").unwrap();
        let dispatcher = Dispatcher::new(Arc::new(registry), Terminal);

        let request = Request::new("GET", "/items/5");
        let trace_id = request.trace_id;
        let response = dispatcher.handle(request).await.unwrap();

        assert_eq!(calls_for(trace_id), vec!["B.Get(items)", "A.Get(5)"]);
        // last write wins per field
        assert_eq!(response.header("X-Handler"), Some("A"));
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_same_shape_templates_cannot_both_register() {
        let mut registry = RouteRegistry::default();
        registry.register::<ItemsById>("/items/<id>").unwrap();
        assert!(registry.register::<ByKind>("/items/<kind>").is_err());
    }

    #[tokio::test]
    async fn test_failing_action_propagates_and_skips_next() {
        let mut registry = RouteRegistry::default();
        registry.register::<Failing>("/fail").unwrap();
        let next = CountingNext::default();
        let dispatcher = Dispatcher::new(Arc::new(registry), &next);

        let err = dispatcher
            .handle(Request::new("GET", "/fail"))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<Boom>().is_some());
        assert_eq!(next.runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_next_runs_for_found_and_not_found() {
        let mut registry = RouteRegistry::default();
        registry.register::<PhotoController>("/photos/<id>").unwrap();
        let next = CountingNext::default();
        let dispatcher = Dispatcher::new(Arc::new(registry), &next);

        dispatcher.handle(Request::new("GET", "/photos/1")).await.unwrap();
        dispatcher.handle(Request::new("GET", "/missing")).await.unwrap();
        assert_eq!(next.runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resolution_is_logged() {
        let log = Arc::new(MemoryLog::default());
        let mut registry = RouteRegistry::new(log.clone());
        registry.register::<PhotoController>("/photos/<id>").unwrap();
        let dispatcher = Dispatcher::new(Arc::new(registry), Terminal);

        dispatcher.handle(Request::new("GET", "/photos/3")).await.unwrap();
        let events = log.events();
        assert_eq!(events.len(), 2);
        assert!(events[1].starts_with("resolved "));
        assert!(events[1].ends_with("::Get"));
    }
}
