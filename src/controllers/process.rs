// Image processing request controller
// POST /process/<filter>/<coords> validates a filter name and a crop
// rectangle `x,y,width,height` and echoes the accepted job

use serde::Serialize;

use crate::routing::{ActionTable, BoxFuture, Controller, HandlerContext, HandlerResult, Params};

pub const TEMPLATE: &str = "/process/<filter>/<coords>";

const FILTERS: &[&str] = &["grayscale", "sepia"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Parse `x,y,width,height`.
pub fn parse_rect(coords: &str) -> Option<Rect> {
    let mut parts = coords.split(',').map(|p| p.trim().parse::<i64>());
    let rect = Rect {
        x: parts.next()?.ok()?,
        y: parts.next()?.ok()?,
        width: parts.next()?.ok()?,
        height: parts.next()?.ok()?,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(rect)
}

/// Accept a known filter name, or `threshold(N)` with N in 0..=100.
pub fn is_known_filter(filter: &str) -> bool {
    if FILTERS.contains(&filter) {
        return true;
    }
    filter
        .strip_prefix("threshold(")
        .and_then(|rest| rest.strip_suffix(')'))
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| n <= 100)
}

#[derive(Serialize)]
struct Job<'a> {
    filter: &'a str,
    rect: Rect,
}

pub struct ProcessController {
    ctx: HandlerContext,
}

impl ProcessController {
    fn post(&mut self, params: Params) -> BoxFuture<'_, HandlerResult> {
        Box::pin(self.accept(params))
    }

    async fn accept(&mut self, params: Params) -> HandlerResult {
        let response = self.ctx.response();
        let filter = params.get("filter").unwrap_or_default();
        let rect = params.get("coords").and_then(parse_rect);

        match rect {
            Some(rect) if is_known_filter(filter) => {
                let body = serde_json::to_vec(&Job { filter, rect })?;
                response.set_status(202);
                response.set_header("Content-Type", "application/json");
                response.set_body(body);
            }
            _ => {
                response.set_status(400);
                response.set_body(format!("unsupported job: {filter}"));
            }
        }
        Ok(())
    }
}

impl Controller for ProcessController {
    fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    fn actions(table: &mut ActionTable<Self>) {
        table.on("Post", &["filter", "coords"], Self::post);
    }
}
