//! HTTP-level integration tests for the warranty management API.
//!
//! Tests that need a live PostgreSQL are `#[ignore]`d and read the
//! connection URL from `WMS_TEST_DATABASE_URL`.

mod helpers;

mod auth_test;
mod health_test;
mod rbac_test;
mod validation_test;
mod workflow_test;
