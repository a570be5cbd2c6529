//! Role checks run before any database access.

use axum::http::StatusCode;
use serde_json::json;

use wms_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn technician_cannot_create_products() {
    let app = TestApp::offline();
    let token = app.token_for(UserRole::Technician);

    let response = app
        .request(
            "POST",
            "/api/products",
            Some(json!({ "name": "Router", "model": "RT-1", "warranty_months": 12 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn only_admins_list_users() {
    let app = TestApp::offline();

    for role in [UserRole::Manager, UserRole::Technician] {
        let token = app.token_for(role);
        let response = app.request("GET", "/api/users", None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "role {role}");
    }
}

#[tokio::test]
async fn technician_cannot_delete_tickets() {
    let app = TestApp::offline();
    let token = app.token_for(UserRole::Technician);

    let response = app
        .request(
            "DELETE",
            &format!("/api/tickets/{}", uuid::Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
