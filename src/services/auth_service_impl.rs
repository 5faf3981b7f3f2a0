//! JWT implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tokio::task;
use tracing::{debug, info};

use crate::config::SecurityConfig;
use crate::services::auth_service::{
    AuthError, AuthService, CredentialLookup, hash_password, verify_password,
};
use crate::services::token::TokenSigner;

pub struct JwtAuthService {
    credentials: Arc<dyn CredentialLookup>,
    signer: TokenSigner,
    /// Checked when the identifier is unknown. Hashed with the configured
    /// params so both failure paths cost the same.
    decoy_hash: Arc<str>,
}

impl JwtAuthService {
    /// # Errors
    ///
    /// Fails if the Argon2 params in `security` are invalid.
    pub fn new(
        credentials: Arc<dyn CredentialLookup>,
        signer: TokenSigner,
        security: &SecurityConfig,
    ) -> anyhow::Result<Self> {
        let bytes: [u8; 16] = rand::rng().random();
        let password: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        let decoy_hash = hash_password(&password, Some(security))?;

        Ok(Self {
            credentials,
            signer,
            decoy_hash: Arc::from(decoy_hash),
        })
    }
}

#[async_trait]
impl AuthService for JwtAuthService {
    async fn sign_in(&self, identifier: &str, password: &str) -> Result<String, AuthError> {
        let credential = self.credentials.find_by_identifier(identifier).await?;

        let (user_id, password_hash) = match credential {
            Some(c) => (Some(c.user_id), c.password_hash),
            None => (None, String::new()),
        };
        let password = password.to_string();
        let decoy_hash = Arc::clone(&self.decoy_hash);

        let matches = task::spawn_blocking(move || {
            if password_hash.is_empty() {
                let _ = verify_password(&password, &decoy_hash);
                false
            } else {
                verify_password(&password, &password_hash)
            }
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?;

        match user_id {
            Some(user_id) if matches => {
                let token = self.signer.issue(&user_id.to_string())?;
                info!(user_id, "Signed in");
                Ok(token)
            }
            _ => {
                debug!("Sign-in rejected");
                Err(AuthError::Unauthorized)
            }
        }
    }

    fn validate_token(&self, token: &str) -> Result<String, AuthError> {
        self.signer.validate(token).map(|claims| claims.sub)
    }
}
