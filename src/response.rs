//! HTTP response builders.
//!
//! Provides convenient functions for building JSON responses.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Response body type used throughout secretaria.
pub type Body = Full<Bytes>;

/// Full response type used throughout secretaria.
pub type HttpResponse = Response<Body>;

fn raw_json(status: StatusCode, json: String) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::from(json)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Build a JSON response with the given status code and body.
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> crate::Result<HttpResponse> {
    let json = serde_json::to_string(body)?;
    Ok(raw_json(status, json))
}

/// Build a 200 OK JSON response.
pub fn ok<T: Serialize>(body: &T) -> crate::Result<HttpResponse> {
    json(StatusCode::OK, body)
}

/// Build a `{"message": ...}` response.
pub fn message(status: StatusCode, text: &str) -> HttpResponse {
    let body = serde_json::json!({ "message": text });
    raw_json(status, body.to_string())
}

/// Build a `{"error": ...}` response.
pub fn error(status: StatusCode, text: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": text });
    raw_json(status, body.to_string())
}

/// Build a 404 Not Found JSON response.
pub fn not_found(text: &str) -> HttpResponse {
    error(StatusCode::NOT_FOUND, text)
}
