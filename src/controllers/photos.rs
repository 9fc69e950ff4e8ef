// Photo lookup controller
// GET /photos/<id> describes a photo; DELETE is refused

use serde::Serialize;

use crate::error::BoxError;
use crate::routing::{ActionTable, BoxFuture, Controller, HandlerContext, HandlerResult, Params};

pub const TEMPLATE: &str = "/photos/<id>";

#[derive(Debug, thiserror::Error)]
#[error("photo {0} cannot be deleted: the photo store is read-only")]
pub struct ReadOnly(pub String);

#[derive(Serialize)]
struct PhotoView<'a> {
    id: &'a str,
    url: String,
}

pub struct PhotoController {
    ctx: HandlerContext,
}

impl PhotoController {
    fn get(&mut self, params: Params) -> BoxFuture<'_, HandlerResult> {
        Box::pin(self.show(params))
    }

    fn delete(&mut self, params: Params) -> BoxFuture<'_, HandlerResult> {
        Box::pin(refuse(params))
    }

    async fn show(&mut self, params: Params) -> HandlerResult {
        let id = params.get("id").unwrap_or_default();
        let view = PhotoView {
            id,
            url: format!("/static/photos/{id}.png"),
        };
        let body = serde_json::to_vec(&view)?;

        let response = self.ctx.response();
        response.set_header("Content-Type", "application/json");
        response.set_body(body);
        Ok(())
    }
}

async fn refuse(params: Params) -> HandlerResult {
    let id = params.get("id").unwrap_or_default().to_string();
    Err(BoxError::from(ReadOnly(id)))
}

impl Controller for PhotoController {
    fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    fn actions(table: &mut ActionTable<Self>) {
        table
            .on("Get", &["id"], Self::get)
            .on("Delete", &["id"], Self::delete);
    }
}
