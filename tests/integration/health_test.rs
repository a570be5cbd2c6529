//! Health endpoint behaviour.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn health_reports_degraded_when_database_is_down() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "degraded");
    assert_eq!(response.body["data"]["database"], "down");
    assert_eq!(
        response.body["data"]["version"],
        env!("CARGO_PKG_VERSION")
    );
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/does-not-exist", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
