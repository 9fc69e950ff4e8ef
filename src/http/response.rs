//! HTTP response building module
//!
//! Renders router responses as hyper responses.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, SERVER};
use hyper::Response;

use crate::config::HttpConfig;
use crate::routing;

/// Build the hyper response for what the handlers wrote
///
/// Defaults are written first and replaced by handler headers of the same
/// name. `Content-Length` always reflects the body.
pub fn build_routed_response(
    routed: routing::Response,
    http: &HttpConfig,
) -> Response<Full<Bytes>> {
    let status = routed.status;
    render(routed, http).unwrap_or_else(|e| {
        log_build_error(&status.to_string(), &e);
        build_500_response()
    })
}

fn render(
    routed: routing::Response,
    http: &HttpConfig,
) -> Result<Response<Full<Bytes>>, hyper::http::Error> {
    let content_length = routed.body.len();
    let mut resp = Response::builder()
        .status(routed.status)
        .body(Full::new(Bytes::from(routed.body)))?;

    let headers = resp.headers_mut();
    headers.insert(SERVER, HeaderValue::from_str(&http.server_name)?);
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&http.default_content_type)?,
    );
    for (name, value) in &routed.headers {
        headers.insert(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(content_length));

    Ok(resp)
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("500 Internal Server Error")))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::from("500 Internal Server Error")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    tracing::error!("Failed to build {status} response: {error}");
}
