//! Domain service for sign-in and token validation.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::warn;

use crate::config::{AdminCredentialConfig, SecurityConfig};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong identifier or password. Carries no detail on purpose.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid or expired token")]
    Unauthenticated,

    #[error("Error signing in: {0}")]
    Issuance(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A user allowed to sign in.
#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: i32,
    pub identifier: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

#[async_trait::async_trait]
pub trait CredentialLookup: Send + Sync {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Credential>, AuthError>;
}

/// Credentials held in memory, typically the single configured admin.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    credentials: Vec<Credential>,
}

impl StaticCredentials {
    #[must_use]
    pub const fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    #[must_use]
    pub fn from_config(admin: &AdminCredentialConfig) -> Self {
        if admin.password_hash.is_empty() {
            warn!("No admin password hash configured, sign-in is disabled");
            return Self::default();
        }

        Self::new(vec![Credential {
            user_id: admin.user_id,
            identifier: admin.email.clone(),
            password_hash: admin.password_hash.clone(),
        }])
    }
}

#[async_trait::async_trait]
impl CredentialLookup for StaticCredentials {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Credential>, AuthError> {
        Ok(self
            .credentials
            .iter()
            .find(|c| c.identifier == identifier)
            .cloned())
    }
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies the credentials and returns a signed token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Unauthorized`] for an unknown identifier or wrong password
    /// - [`AuthError::Issuance`] when the token cannot be signed
    async fn sign_in(&self, identifier: &str, password: &str) -> Result<String, AuthError>;

    /// Returns the token's subject (user id).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] for any invalid token.
    fn validate_token(&self, token: &str) -> Result<String, AuthError>;
}

/// Hash a password using Argon2id.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Params are read from the PHC string. A malformed hash never matches.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("password", Some(&cheap_params())).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("password", &hash));
        assert!(!verify_password("Password", &hash));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password("password", ""));
        assert!(!verify_password("password", "$2a$12$not-argon"));
    }

    #[tokio::test]
    async fn test_static_credentials_lookup() {
        let admin = AdminCredentialConfig {
            password_hash: "$argon2id$placeholder".to_string(),
            ..AdminCredentialConfig::default()
        };
        let lookup = StaticCredentials::from_config(&admin);

        let found = lookup.find_by_identifier("me@here.com").await.unwrap();
        assert_eq!(found.map(|c| c.user_id), Some(10));
        assert!(lookup.find_by_identifier("you@there.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_hash_disables_credentials() {
        let lookup = StaticCredentials::from_config(&AdminCredentialConfig::default());
        assert!(lookup.find_by_identifier("me@here.com").await.unwrap().is_none());
    }
}
