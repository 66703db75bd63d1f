//! Credential resolution.
//!
//! The pipeline only needs [`CredentialStore::authenticate`]; any identity
//! provider can sit behind it. [`InMemoryCredentialStore`] is the shipped
//! implementation, built from the `auth.users` configuration.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::UserSettings;
use crate::models::Principal;
use crate::services::ServiceError;
use crate::utils::{hash_password, verify_password, Password, PasswordHashString};

/// Username/password pair as presented by the client.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Password,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Password::new(password),
        }
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Resolve credentials to a principal, or `InvalidCredentials`.
    async fn authenticate(&self, credentials: Credentials) -> Result<Principal, ServiceError>;
}

struct StoredUser {
    principal: Principal,
    password_hash: PasswordHashString,
}

pub struct InMemoryCredentialStore {
    users: Arc<HashMap<String, StoredUser>>,
    /// Verified against when the username is unknown so both failure paths
    /// cost one Argon2 run.
    decoy_hash: PasswordHashString,
}

impl InMemoryCredentialStore {
    pub fn from_settings(users: &[UserSettings]) -> Result<Self, ServiceError> {
        let mut stored = HashMap::with_capacity(users.len());

        for user in users {
            let password_hash =
                hash_password(&Password::new(user.password.expose_secret().as_str()))?;
            stored.insert(
                user.name.clone(),
                StoredUser {
                    principal: Principal::new(user.name.clone(), user.roles.iter().cloned()),
                    password_hash,
                },
            );
        }

        let decoy_hash = hash_password(&Password::new("decoy-password-never-matches"))?;

        tracing::info!(users = stored.len(), "Credential store initialized");

        Ok(Self {
            users: Arc::new(stored),
            decoy_hash,
        })
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn authenticate(&self, credentials: Credentials) -> Result<Principal, ServiceError> {
        let users = self.users.clone();
        let decoy_hash = self.decoy_hash.clone();

        // Argon2 verification blocks; run it off the async workers.
        tokio::task::spawn_blocking(move || -> Result<Principal, ServiceError> {
            let (user, hash) = match users.get(&credentials.username) {
                Some(user) => (Some(user), &user.password_hash),
                None => (None, &decoy_hash),
            };

            let matches = verify_password(&credentials.password, hash)?;

            match user {
                Some(user) if matches => Ok(user.principal.clone()),
                _ => Err(ServiceError::InvalidCredentials),
            }
        })
        .await
        .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Credential check aborted: {}", e)))?
    }
}
