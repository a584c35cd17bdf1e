//! Transport-level behaviour: limits, headers and unmatched routes.

use serde_json::{Value, json};

use super::harness;

#[tokio::test]
async fn oversized_content_length_is_rejected() {
    let app = harness::start().await;

    let request = "POST /api/students HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 2000000\r\nConnection: close\r\n\r\n";
    let raw = harness::raw_request(app.addr(), request.as_bytes()).await;
    let (status, _, body) = harness::parse_response(&raw);
    assert_eq!(status, 413);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "error": "Payload too large" }));

    app.stop().await;
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let app = harness::start().await;

    let (status, body) = harness::send(app.addr(), "PATCH", "/api/students/1", Some(&json!({}))).await;
    assert_eq!(status, 405);
    assert_eq!(body, json!({ "error": "Method not allowed" }));

    app.stop().await;
}

#[tokio::test]
async fn unmatched_paths_are_404() {
    let app = harness::start().await;

    for path in ["/students", "/api/unknown", "/api/students/abc", "/api/grades/student/x"] {
        let (status, body) = app.get(path).await;
        assert_eq!(status, 404, "{path}");
        assert_eq!(body, json!({ "error": "Not found" }), "{path}");
    }

    app.stop().await;
}

#[tokio::test]
async fn responses_carry_json_and_nosniff_headers() {
    let app = harness::start().await;

    let request = "GET /api/teachers HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
    let raw = harness::raw_request(app.addr(), request.as_bytes()).await;
    let (status, head, body) = harness::parse_response(&raw);
    assert_eq!(status, 200);

    let head = head.to_ascii_lowercase();
    assert!(head.contains("x-content-type-options: nosniff"), "{head}");
    assert!(head.contains("content-type: application/json"), "{head}");
    assert_eq!(body, b"[]");

    app.stop().await;
}

#[tokio::test]
async fn shutdown_stops_accepting() {
    let app = harness::start().await;
    let addr = app.addr();
    app.stop().await;

    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}
