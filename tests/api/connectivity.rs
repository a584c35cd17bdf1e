//! Every operation reports an unreachable database the same way.

use serde_json::json;

use super::harness;

#[tokio::test]
async fn every_operation_reports_connection_failure() {
    let app = harness::start_unreachable().await;
    let expected = json!({ "error": "Failed to connect to the database" });
    let body = json!({ "nome_disciplina": "História" });

    let responses = [
        ("list", app.get("/api/subjects").await),
        ("get", app.get("/api/subjects/1").await),
        ("create", app.post("/api/subjects", &body).await),
        ("update", app.put("/api/subjects/1", &body).await),
        ("delete", app.delete("/api/subjects/1").await),
        ("lookup", app.get("/api/grades/student/1").await),
        ("composite", app.get("/api/activity_students/1/1").await),
    ];
    for (operation, (status, body)) in responses {
        assert_eq!(status, 500, "{operation}");
        assert_eq!(body, expected, "{operation}");
    }

    app.stop().await;
}

#[tokio::test]
async fn connection_failure_wins_over_invalid_body() {
    let app = harness::start_unreachable().await;

    let (status, body) = app.post("/api/students", &json!({})).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Failed to connect to the database" }));

    let (status, _) = harness::send_raw_body(app.addr(), "POST", "/api/students", "{nope").await;
    assert_eq!(status, 500);

    app.stop().await;
}
