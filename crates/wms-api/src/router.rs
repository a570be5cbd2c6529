//! Route definitions for the warranty management HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the API router (without global middleware).
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(user_routes())
        .merge(product_routes())
        .merge(contract_routes())
        .merge(serial_routes())
        .merge(ticket_routes())
        .merge(warranty_history_routes())
        .merge(notification_routes())
        .merge(dashboard_routes())
        .merge(public_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Health endpoint (public)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Auth endpoints: login, me, change-password
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/auth/me",
            get(handlers::auth::me).patch(handlers::auth::update_me),
        )
        .route(
            "/auth/change-password",
            post(handlers::auth::change_password),
        )
}

/// User administration (admin only)
fn user_routes() -> Router<AppState> {
    use handlers::user;

    Router::new()
        .route("/users", get(user::list_users).post(user::create_user))
        .route(
            "/users/{id}",
            get(user::get_user)
                .patch(user::update_user)
                .delete(user::delete_user),
        )
        .route("/users/{id}/reset-password", post(user::reset_password))
}

fn product_routes() -> Router<AppState> {
    use handlers::product;

    Router::new()
        .route(
            "/products",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/products/{id}",
            get(product::get_product)
                .patch(product::update_product)
                .delete(product::delete_product),
        )
}

fn contract_routes() -> Router<AppState> {
    use handlers::contract;

    Router::new()
        .route(
            "/contracts",
            get(contract::list_contracts).post(contract::create_contract),
        )
        .route(
            "/contracts/number/{contract_number}",
            get(contract::get_contract_by_number),
        )
        .route(
            "/contracts/customer/{email}",
            get(contract::contracts_by_customer),
        )
        .route(
            "/contracts/{id}",
            get(contract::get_contract)
                .patch(contract::update_contract)
                .delete(contract::delete_contract),
        )
}

fn serial_routes() -> Router<AppState> {
    use handlers::serial;

    Router::new()
        .route(
            "/serials",
            get(serial::list_serials).post(serial::create_serial),
        )
        .route(
            "/serials/warranty-request",
            post(serial::create_warranty_request),
        )
        .route(
            "/serials/number/{serial_number}",
            get(serial::get_serial_by_number),
        )
        .route(
            "/serials/warranty/{serial_number}",
            get(serial::check_warranty),
        )
        .route(
            "/serials/customer/{email}",
            get(serial::serials_by_customer),
        )
        .route(
            "/serials/{id}",
            get(serial::get_serial)
                .patch(serial::update_serial)
                .delete(serial::delete_serial),
        )
        .route(
            "/serials/{id}/warranty-status",
            patch(serial::update_warranty_status),
        )
}

fn ticket_routes() -> Router<AppState> {
    use handlers::ticket;

    Router::new()
        .route(
            "/tickets",
            get(ticket::list_tickets).post(ticket::create_ticket),
        )
        .route(
            "/tickets/{id}",
            get(ticket::get_ticket)
                .patch(ticket::update_ticket)
                .delete(ticket::delete_ticket),
        )
        .route("/tickets/{id}/status", patch(ticket::update_status))
        .route("/tickets/{id}/assign", post(ticket::assign_ticket))
        .route("/tickets/{id}/history", get(ticket::ticket_history))
        .route(
            "/tickets/{id}/comments",
            get(ticket::list_comments).post(ticket::add_comment),
        )
        .route("/tickets/{id}/send-email", post(ticket::send_email))
}

fn warranty_history_routes() -> Router<AppState> {
    use handlers::warranty_history as history;

    Router::new()
        .route(
            "/warranty-history",
            get(history::list_history).post(history::create_history),
        )
        .route(
            "/warranty-history/serial/{serial_id}",
            get(history::history_by_serial),
        )
        .route(
            "/warranty-history/{id}",
            get(history::get_history)
                .patch(history::update_history)
                .delete(history::delete_history),
        )
}

fn notification_routes() -> Router<AppState> {
    use handlers::notification;

    Router::new()
        .route(
            "/notifications",
            get(notification::list_notifications).post(notification::create_notification),
        )
        .route(
            "/notifications/unread-count",
            get(notification::unread_count),
        )
        .route(
            "/notifications/mark-all-read",
            post(notification::mark_all_read),
        )
        .route(
            "/notifications/{id}",
            get(notification::get_notification)
                .patch(notification::update_notification)
                .delete(notification::delete_notification),
        )
        .route("/notifications/{id}/read", post(notification::mark_read))
}

fn dashboard_routes() -> Router<AppState> {
    use handlers::dashboard;

    Router::new()
        .route("/dashboard/statistics", get(dashboard::statistics))
        .route(
            "/dashboard/charts/warranty-requests",
            get(dashboard::warranty_request_chart),
        )
        .route(
            "/dashboard/charts/product-failures",
            get(dashboard::product_failure_chart),
        )
}

/// Unauthenticated customer-facing endpoints
fn public_routes() -> Router<AppState> {
    use handlers::portal;

    Router::new()
        .route(
            "/public/warranty/{serial_number}",
            get(handlers::serial::check_warranty),
        )
        .route(
            "/customer-portal/overview/{email}",
            get(portal::overview),
        )
        .route(
            "/customer-portal/warranty-history/{email}",
            get(portal::warranty_history),
        )
        .route(
            "/customer-portal/support-request",
            post(portal::support_request),
        )
}
