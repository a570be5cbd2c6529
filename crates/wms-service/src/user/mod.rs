//! Staff account services: self-service profile and admin management.

pub mod admin;
pub mod service;

pub use admin::{AdminUserService, CreateUserInput, UpdateUserInput};
pub use service::{LoginResponse, UpdateProfileInput, UserService};

use wms_core::error::AppError;

/// Trim and lowercase an email, rejecting obviously malformed input.
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::validation(format!("Invalid email address: '{email}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Admin@Example.COM ").unwrap(),
            "admin@example.com"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("user@localhost").is_err());
    }
}
