//! Password policy enforcement for new passwords.

use wms_core::config::auth::AuthConfig;
use wms_core::error::AppError;

/// Validates new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    require_mixed: bool,
    min_strength: u8,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            require_mixed: config.password_require_mixed,
            min_strength: config.password_min_strength.min(4),
        }
    }

    /// Validates a password against the policy.
    ///
    /// Returns the first violation found. `user_inputs` (email, name) are
    /// penalised by the strength estimate.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if self.require_mixed {
            if !password.chars().any(char::is_alphabetic) {
                return Err(AppError::validation(
                    "Password must contain at least one letter",
                ));
            }
            if !password.chars().any(|c| c.is_ascii_digit()) {
                return Err(AppError::validation(
                    "Password must contain at least one digit",
                ));
            }
        }

        if self.min_strength > 0 {
            let estimate = zxcvbn::zxcvbn(password, user_inputs);
            if (estimate.score() as u8) < self.min_strength {
                return Err(AppError::validation(
                    "Password is too weak. Please use a longer or less predictable password.",
                ));
            }
        }

        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(&self, old_password: &str, new_password: &str) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(min: usize, mixed: bool, strength: u8) -> PasswordValidator {
        PasswordValidator::new(&AuthConfig {
            password_min_length: min,
            password_require_mixed: mixed,
            password_min_strength: strength,
            ..AuthConfig::default()
        })
    }

    #[test]
    fn default_policy_only_checks_length() {
        let v = PasswordValidator::new(&AuthConfig::default());
        assert!(v.validate("12345", &[]).is_err());
        assert!(v.validate("123456", &[]).is_ok());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let v = validator(4, false, 0);
        assert!(v.validate("äöü", &[]).is_err());
        assert!(v.validate("äöüß", &[]).is_ok());
    }

    #[test]
    fn mixed_requires_letter_and_digit() {
        let v = validator(6, true, 0);
        assert!(v.validate("abcdefgh", &[]).is_err());
        assert!(v.validate("12345678", &[]).is_err());
        assert!(v.validate("abcd1234", &[]).is_ok());
    }

    #[test]
    fn strength_check_rejects_common_passwords() {
        let v = validator(6, false, 3);
        assert!(v.validate("password", &[]).is_err());
        assert!(v.validate("correct-horse-battery-staple-42", &[]).is_ok());
    }

    #[test]
    fn reuse_is_rejected() {
        let v = validator(6, false, 0);
        assert!(v.validate_not_same("same-one", "same-one").is_err());
        assert!(v.validate_not_same("old-one", "new-one").is_ok());
    }
}
