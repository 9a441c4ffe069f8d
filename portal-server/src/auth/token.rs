//! JWT session tokens
//!
//! HS256 bearer tokens carrying the employee ID and display name.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Employee ID
    pub sub: String,
    /// Employee display name
    pub name: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

/// Issued token with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Unix millis
    pub expires_at: i64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry: Duration::hours(expiry_hours.max(1)),
        }
    }

    pub fn create_token(&self, employee_id: &str, name: &str) -> Result<IssuedToken, JwtError> {
        self.create_token_at(employee_id, name, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn create_token_at(
        &self,
        employee_id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let expires = now + self.expiry;
        let claims = Claims {
            sub: employee_id.to_string(),
            name: name.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;
        Ok(IssuedToken {
            token,
            expires_at: expires.timestamp_millis(),
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// Extract the token from an `Authorization: Bearer <token>` header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_validates() {
        let jwt = JwtService::new("test-secret-test-secret-test-secret", 12);
        let issued = jwt.create_token("E001", "王小明").unwrap();
        let claims = jwt.validate_token(&issued.token).unwrap();
        assert_eq!(claims.sub, "E001");
        assert_eq!(claims.name, "王小明");
        assert_eq!(claims.exp - claims.iat, 12 * 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = JwtService::new("test-secret-test-secret-test-secret", 12);
        let issued = jwt
            .create_token_at("E001", "王小明", Utc::now() - Duration::hours(13))
            .unwrap();
        assert!(matches!(
            jwt.validate_token(&issued.token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let ours = JwtService::new("secret-one-secret-one-secret-one", 12);
        let theirs = JwtService::new("secret-two-secret-two-secret-two", 12);
        let issued = theirs.create_token("E001", "王小明").unwrap();
        assert!(matches!(
            ours.validate_token(&issued.token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
