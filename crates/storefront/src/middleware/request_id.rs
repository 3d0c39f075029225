//! Request correlation ids.
//!
//! A well-formed `x-request-id` from the proxy is kept; anything missing,
//! oversized or containing non-printable bytes is replaced with a UUID v4.
//! The id ends up in the request span, the Sentry scope, the request
//! extensions and the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// The id assigned to the current request, available as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

fn accept_upstream(value: &HeaderValue) -> Option<String> {
    let id = value.to_str().ok()?.trim();
    let printable = id.bytes().all(|b| b.is_ascii_graphic());
    (!id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && printable).then(|| id.to_owned())
}

/// Assign a request id and echo it back.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(accept_upstream)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::Span::current().record("request_id", id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &id));

    let header = HeaderValue::from_str(&id).ok();
    request.extensions_mut().insert(RequestId(id));

    let mut response = next.run(request).await;
    if let Some(header) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, header);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Extension, Router,
        body::{Body, to_bytes},
        http::Request as HttpRequest,
        middleware::from_fn,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(RequestId(id)): Extension<RequestId>| async move { id }),
            )
            .layer(from_fn(request_id_middleware))
    }

    async fn call(header: Option<&str>) -> (String, String) {
        let mut request = HttpRequest::get("/");
        if let Some(value) = header {
            request = request.header(REQUEST_ID_HEADER, value);
        }
        let response = app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let echoed = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_owned();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (echoed, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_upstream_id_is_kept() {
        let (echoed, seen) = call(Some("edge-4f2a")).await;
        assert_eq!(echoed, "edge-4f2a");
        assert_eq!(seen, "edge-4f2a");
    }

    #[tokio::test]
    async fn test_missing_or_bad_id_is_replaced() {
        for header in [None, Some(""), Some("has space"), Some(&"x".repeat(200)[..])] {
            let (echoed, seen) = call(header).await;
            assert_eq!(echoed, seen);
            assert!(Uuid::parse_str(&echoed).is_ok(), "{header:?}");
        }
    }
}
