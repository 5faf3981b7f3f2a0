//! HS256 access tokens for the admin routes.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SecurityConfig;
use crate::services::auth_service::AuthError;

/// Claims embedded in every token. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string.
    pub sub: String,
    pub iss: String,
    pub aud: Vec<String>,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    domain: String,
    ttl_seconds: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("domain", &self.domain)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: impl Into<String>, domain: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            domain: domain.into(),
            ttl_seconds: ttl_hours * 3600,
        }
    }

    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            config.token_domain.clone(),
            config.token_ttl_hours,
        )
    }

    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Issues a token as if signed at `issued_at`; `nbf` equals `iat`.
    pub fn issue_at(&self, subject: &str, issued_at: i64) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::Issuance(
                "signing secret is not configured".to_string(),
            ));
        }

        let claims = Claims {
            sub: subject.to_string(),
            iss: self.domain.clone(),
            aud: vec![self.domain.clone()],
            iat: issued_at,
            nbf: issued_at,
            exp: issued_at + self.ttl_seconds,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Issuance(e.to_string()))
    }

    /// Checks signature, issuer, audience, `nbf` and `exp` with no leeway.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.domain]);
        validation.set_audience(&[&self.domain]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "Rejected token");
            AuthError::Unauthenticated
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret-that-is-long-enough-for-hmac", "mydomain.com", 24)
    }

    #[test]
    fn test_issue_and_validate() {
        let signer = signer();
        let token = signer.issue("10").unwrap();

        let claims = signer.validate(&token).unwrap();
        assert_eq!(claims.sub, "10");
        assert_eq!(claims.iss, "mydomain.com");
        assert_eq!(claims.aud, vec!["mydomain.com".to_string()]);
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_expired_token_fails() {
        let signer = signer();
        let two_days_ago = Utc::now().timestamp() - 48 * 3600;
        let token = signer.issue_at("10", two_days_ago).unwrap();

        assert!(matches!(
            signer.validate(&token),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn test_not_yet_valid_token_fails() {
        let signer = signer();
        let in_an_hour = Utc::now().timestamp() + 3600;
        let token = signer.issue_at("10", in_an_hour).unwrap();

        assert!(matches!(
            signer.validate(&token),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn test_different_secrets_fail() {
        let token = TokenSigner::new("secret-alpha", "mydomain.com", 24)
            .issue("10")
            .unwrap();

        let result = TokenSigner::new("secret-bravo", "mydomain.com", 24).validate(&token);
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn test_wrong_audience_fails() {
        let token = TokenSigner::new("shared", "other.example", 24)
            .issue("10")
            .unwrap();

        let result = TokenSigner::new("shared", "mydomain.com", 24).validate(&token);
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn test_garbage_token_fails() {
        assert!(matches!(
            signer().validate("not.a.jwt"),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn test_empty_secret_cannot_issue() {
        let result = TokenSigner::new("", "mydomain.com", 24).issue("10");
        assert!(matches!(result, Err(AuthError::Issuance(_))));
    }
}
