use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, ServerConfig};
use service_core::error::AppError;
use service_core::observability::LogFormat;

use crate::models::Card;

/// Environment variables use this prefix: `CARD__SERVER__PORT`, `CARD__STORE__BACKEND`, ...
pub const ENV_PREFIX: &str = "CARD";

#[derive(Debug, Clone, Deserialize)]
pub struct CardConfig {
    pub service_name: String,
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    pub auth: AuthSettings,
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Role every caller needs to reach `/cards`.
    pub required_role: String,
    #[serde(default)]
    pub users: Vec<UserSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSettings {
    pub name: String,
    pub password: Secret<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    #[serde(default)]
    pub database_url: Option<Secret<String>>,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Records loaded at startup, ids included.
    #[serde(default)]
    pub seed: Vec<Card>,
}

impl CardConfig {
    /// Defaults, then `configuration.*`, then `CARD__*` environment variables.
    pub fn load() -> Result<Self, AppError> {
        let config: CardConfig = core_config::layered(ENV_PREFIX)
            .set_default("service_name", "card-service")?
            .set_default("log_level", "info,card_service=debug")?
            .set_default("auth.required_role", "CARD-OWNER")?
            .set_default("store.backend", "memory")?
            .set_default("store.max_connections", 10)?
            .set_default("store.min_connections", 1)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.required_role.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "auth.required_role must not be empty"
            )));
        }

        if let Some(user) = self.auth.users.iter().find(|u| u.name.trim().is_empty()) {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "auth.users entry with roles {:?} has no name",
                user.roles
            )));
        }

        if self.store.backend == StoreBackend::Postgres && self.store.database_url.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "store.database_url is required for the postgres backend"
            )));
        }

        if self.store.min_connections > self.store.max_connections {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "store.min_connections must not exceed store.max_connections"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CardConfig {
        CardConfig {
            service_name: "card-service".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            otlp_endpoint: None,
            server: ServerConfig::default(),
            auth: AuthSettings {
                required_role: "CARD-OWNER".to_string(),
                users: vec![UserSettings {
                    name: "Owen".to_string(),
                    password: Secret::new("pw".to_string()),
                    roles: vec!["CARD-OWNER".to_string()],
                }],
            },
            store: StoreSettings {
                backend: StoreBackend::Memory,
                database_url: None,
                max_connections: 10,
                min_connections: 1,
                seed: vec![],
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_empty_role_rejected() {
        let mut config = base();
        config.auth.required_role = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nameless_user_rejected() {
        let mut config = base();
        config.auth.users[0].name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = base();
        config.store.backend = StoreBackend::Postgres;
        assert!(config.validate().is_err());

        config.store.database_url = Some(Secret::new("postgres://localhost/cards".to_string()));
        assert!(config.validate().is_ok());
    }
}
