//! End-to-end flows against a live database.

use axum::http::StatusCode;
use chrono::NaiveDate;
use serde_json::json;

use wms_core::error::ErrorKind;
use wms_database::repositories::{StatisticsRepository, TicketRepository};
use wms_entity::ticket::{CreateTicket, TicketPriority, TicketStatus};
use wms_entity::user::UserRole;
use wms_service::user::CreateUserInput;

use crate::helpers::{TestApp, unique};

async fn login_as(app: &TestApp, role: UserRole) -> String {
    let email = format!("{}@example.com", unique(role.as_str()));
    app.state
        .admin_user_service
        .provision(CreateUserInput {
            email: email.clone(),
            password: "password123".into(),
            full_name: "Test User".into(),
            role: Some(role),
            is_active: Some(true),
        })
        .await
        .unwrap();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": email, "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "requires WMS_TEST_DATABASE_URL"]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::live().await;
    let _ = login_as(&app, UserRole::Technician).await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": "password123" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires WMS_TEST_DATABASE_URL"]
async fn registered_serial_is_covered_publicly() {
    let app = TestApp::live().await;
    let token = login_as(&app, UserRole::Manager).await;

    let product = app
        .request(
            "POST",
            "/api/products",
            Some(json!({
                "name": "Access Point",
                "model": unique("AP"),
                "warranty_months": 24
            })),
            Some(&token),
        )
        .await;
    assert_eq!(product.status, StatusCode::CREATED);
    let product_id = product.body["data"]["id"].as_str().unwrap().to_string();

    let serial_number = unique("SN");
    let serial = app
        .request(
            "POST",
            "/api/serials",
            Some(json!({ "serial_number": serial_number, "product_id": product_id })),
            Some(&token),
        )
        .await;
    assert_eq!(serial.status, StatusCode::CREATED);

    let check = app
        .request(
            "GET",
            &format!("/api/public/warranty/{serial_number}"),
            None,
            None,
        )
        .await;
    assert_eq!(check.status, StatusCode::OK);
    assert_eq!(check.body["data"]["warranty"]["is_valid"], true);
    assert_eq!(check.body["data"]["warranty"]["status"], "active");
}

#[tokio::test]
#[ignore = "requires WMS_TEST_DATABASE_URL"]
async fn duplicate_serial_number_conflicts() {
    let app = TestApp::live().await;
    let token = login_as(&app, UserRole::Manager).await;

    let product = app
        .request(
            "POST",
            "/api/products",
            Some(json!({ "name": "Switch", "model": unique("SW"), "warranty_months": 12 })),
            Some(&token),
        )
        .await;
    let product_id = product.body["data"]["id"].as_str().unwrap().to_string();

    let body = json!({ "serial_number": unique("SN"), "product_id": product_id });
    let first = app
        .request("POST", "/api/serials", Some(body.clone()), Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .request("POST", "/api/serials", Some(body), Some(&token))
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires WMS_TEST_DATABASE_URL"]
async fn stale_ticket_write_conflicts() {
    let app = TestApp::live().await;
    let repo = TicketRepository::new(app.state.db_pool.clone());

    let ticket = repo
        .create(
            &CreateTicket {
                ticket_number: unique("TK"),
                serial_id: None,
                issue_description: "Fan is noisy".into(),
                priority: TicketPriority::Low,
                customer_name: "Ann".into(),
                customer_email: None,
                customer_phone: None,
                assigned_to: None,
                created_by: None,
            },
            &[],
        )
        .await
        .unwrap();

    let mut first = ticket.editable();
    first.priority = TicketPriority::High;
    repo.update(ticket.id, &first, &[], None).await.unwrap();

    // Planned from the same snapshot, after the row already moved on.
    let mut second = ticket.editable();
    second.status = TicketStatus::Received;
    let err = repo
        .update(ticket.id, &second, &[], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let stored = repo.find_by_id(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.priority, TicketPriority::High);
    assert_eq!(stored.status, TicketStatus::New);
}

#[tokio::test]
#[ignore = "requires WMS_TEST_DATABASE_URL"]
async fn technician_cannot_delete_a_broadcast() {
    let app = TestApp::live().await;
    let manager = login_as(&app, UserRole::Manager).await;
    let technician = login_as(&app, UserRole::Technician).await;

    let created = app
        .request(
            "POST",
            "/api/notifications",
            Some(json!({ "kind": "warning", "title": "Maintenance", "message": "Tonight" })),
            Some(&manager),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let uri = format!(
        "/api/notifications/{}",
        created.body["data"]["id"].as_str().unwrap()
    );

    let denied = app.request("DELETE", &uri, None, Some(&technician)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let deleted = app.request("DELETE", &uri, None, Some(&manager)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "requires WMS_TEST_DATABASE_URL"]
async fn monthly_revenue_counts_cancelled_contracts() {
    let app = TestApp::live().await;
    let token = login_as(&app, UserRole::Manager).await;
    let stats = StatisticsRepository::new(app.state.db_pool.clone());
    let from = NaiveDate::from_ymd_opt(2091, 5, 1).unwrap();
    let until = NaiveDate::from_ymd_opt(2091, 6, 1).unwrap();

    let product = app
        .request(
            "POST",
            "/api/products",
            Some(json!({ "name": "Gateway", "model": unique("GW"), "warranty_months": 12 })),
            Some(&token),
        )
        .await;
    let product_id = product.body["data"]["id"].as_str().unwrap().to_string();

    let before = stats.contract_revenue(from, until).await.unwrap();
    let contract = app
        .request(
            "POST",
            "/api/contracts",
            Some(json!({
                "contract_number": unique("CT"),
                "customer_name": "Acme",
                "customer_email": "buyer@acme.example",
                "start_date": "2091-05-10",
                "end_date": "2092-05-10",
                "status": "cancelled",
                "items": [{ "product_id": product_id, "quantity": 2, "unit_price": 5000 }]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(contract.status, StatusCode::CREATED);

    let after = stats.contract_revenue(from, until).await.unwrap();
    assert_eq!(after - before, 10_000);
}
