//! Request id propagation.
//!
//! Every request carries an `x-request-id`, taken from the caller when present
//! and generated otherwise. Handlers run inside an `http` span tagged with it.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

fn incoming_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub async fn ensure_request_id(mut request: Request, next: Next) -> Response {
    let request_id = match incoming_id(&request) {
        Some(id) => id,
        None => {
            let generated = uuid::Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&generated) {
                request.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            generated
        }
    };

    let span = tracing::info_span!(
        "http",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path()
    );
    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
