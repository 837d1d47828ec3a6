use axum::extract::Request;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

// ==============================================================================
// CORS Shim
// ==============================================================================
//
// Wraps the whole router. Preflight requests are answered here without
// routing; every other response gets the same headers appended after the
// inner layers ran. Headers set by inner layers are never replaced.

pub(crate) const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "Origin, Accept, Content-Type, X-Requested-With, X-CSRF-Token",
    ),
];

fn append_cors_headers(headers: &mut HeaderMap) {
    for (name, value) in CORS_HEADERS {
        headers.append(name, HeaderValue::from_static(value));
    }
}

pub(crate) async fn cors_shim(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
        append_cors_headers(headers);
        return response;
    }

    let mut response = next.run(request).await;
    append_cors_headers(response.headers_mut());
    response
}
