//! Request body validation.

use axum::http::StatusCode;
use serde_json::json;

use wms_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn login_rejects_malformed_email() {
    let app = TestApp::offline();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "not-an-email", "password": "secret" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(response.body["details"]["email"].is_array());
}

#[tokio::test]
async fn product_requires_positive_warranty_months() {
    let app = TestApp::offline();
    let token = app.token_for(UserRole::Manager);

    let response = app
        .request(
            "POST",
            "/api/products",
            Some(json!({ "name": "Router", "model": "RT-1", "warranty_months": 0 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["details"]["warranty_months"].is_array());
}

#[tokio::test]
async fn contract_item_price_is_bounded() {
    let app = TestApp::offline();
    let token = app.token_for(UserRole::Manager);

    let response = app
        .request(
            "POST",
            "/api/contracts",
            Some(json!({
                "contract_number": "CT-1",
                "customer_name": "Acme",
                "customer_email": "buyer@acme.example",
                "start_date": "2024-01-01",
                "end_date": "2025-01-01",
                "items": [{
                    "product_id": "00000000-0000-0000-0000-000000000001",
                    "quantity": 1000,
                    "unit_price": 9_223_372_036_854_775_807_i64
                }]
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unparseable_body_is_a_validation_error() {
    let app = TestApp::offline();
    let token = app.token_for(UserRole::Manager);

    let response = app
        .request(
            "POST",
            "/api/products",
            Some(json!({ "name": "Router" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn database_failures_are_not_leaked() {
    let app = TestApp::offline();

    let response = app
        .request("GET", "/api/public/warranty/SN-UNKNOWN", None, None)
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "An internal error occurred");
}
