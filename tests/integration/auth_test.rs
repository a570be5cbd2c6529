//! Bearer token handling.

use axum::http::StatusCode;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use wms_auth::Claims;
use wms_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/products", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = TestApp::offline();

    let response = app
        .request("GET", "/api/tickets", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = TestApp::offline();
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4(),
        email: "late@example.com".into(),
        role: UserRole::Admin,
        iat: now - 7200,
        exp: now - 3600,
        iss: app.config.auth.jwt_issuer.clone(),
        jti: Uuid::new_v4(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(app.config.auth.jwt_secret.as_bytes()),
    )
    .unwrap();

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Token has expired");
}

#[tokio::test]
async fn token_signed_with_other_secret_is_unauthorized() {
    let app = TestApp::offline();
    let mut other = app.config.auth.clone();
    other.jwt_secret = "a-completely-different-secret-0123456789".into();
    let token = wms_auth::JwtEncoder::new(&other)
        .issue(Uuid::new_v4(), "x@example.com", UserRole::Admin)
        .unwrap()
        .token;

    let response = app.request("GET", "/api/users", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
