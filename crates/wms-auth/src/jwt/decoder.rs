//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use wms_core::config::auth::AuthConfig;
use wms_core::error::AppError;

use super::claims::Claims;

/// Validates access tokens: signature, expiry and issuer.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        validation.set_issuer(&[config.jwt_issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::unauthorized("Invalid token format")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::unauthorized("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AppError::unauthorized("Invalid token issuer")
                }
                _ => AppError::unauthorized(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    use wms_core::config::auth::AuthConfig;
    use wms_core::error::ErrorKind;
    use wms_entity::user::UserRole;

    use super::super::{Claims, JwtEncoder};
    use super::JwtDecoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    const SECRET: &str = "a-test-secret-that-is-long-enough-1234";

    #[test]
    fn issued_token_decodes_to_same_claims() {
        let cfg = config(SECRET);
        let user_id = Uuid::new_v4();
        let issued = JwtEncoder::new(&cfg)
            .issue(user_id, "tech@example.com", UserRole::Technician)
            .unwrap();

        let claims = JwtDecoder::new(&cfg).decode(&issued.token).unwrap();
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.email, "tech@example.com");
        assert_eq!(claims.role, UserRole::Technician);
        assert_eq!(claims.iss, "wms");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let issued = JwtEncoder::new(&config(SECRET))
            .issue(Uuid::new_v4(), "a@example.com", UserRole::Admin)
            .unwrap();
        let err = JwtDecoder::new(&config("another-secret-that-is-long-enough-99"))
            .decode(&issued.token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "old@example.com".into(),
            role: UserRole::Manager,
            iat: now - 7200,
            exp: now - 3600,
            iss: "wms".into(),
            jti: Uuid::new_v4(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = JwtDecoder::new(&config(SECRET)).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let mut other = config(SECRET);
        other.jwt_issuer = "someone-else".into();
        let issued = JwtEncoder::new(&other)
            .issue(Uuid::new_v4(), "a@example.com", UserRole::Admin)
            .unwrap();
        assert!(JwtDecoder::new(&config(SECRET)).decode(&issued.token).is_err());
    }

    #[test]
    fn garbage_is_unauthorized() {
        let err = JwtDecoder::new(&config(SECRET))
            .decode("not.a.jwt")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
