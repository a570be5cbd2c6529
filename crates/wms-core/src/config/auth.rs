//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Value of the `iss` claim.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Access token TTL in hours.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_hours: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Require at least one letter and one digit.
    #[serde(default)]
    pub password_require_mixed: bool,
    /// Minimum zxcvbn score (0-4). Zero disables the strength check.
    #[serde(default)]
    pub password_min_strength: u8,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_issuer(),
            access_token_ttl_hours: default_access_ttl(),
            password_min_length: default_password_min(),
            password_require_mixed: false,
            password_min_strength: 0,
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_issuer() -> String {
    "wms".to_string()
}

fn default_access_ttl() -> u64 {
    24
}

fn default_password_min() -> usize {
    6
}
