use config::{Config as Cfg, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

/// HTTP listener settings shared by every service.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Starts a layered configuration: an optional `configuration.{toml,yaml,json}`
/// file in the working directory, overridden by `{env_prefix}__SECTION__KEY`
/// environment variables. `.env` is loaded first so it feeds the environment
/// layer.
///
/// Callers add their own defaults and call `build()`.
pub fn layered(env_prefix: &str) -> ConfigBuilder<DefaultState> {
    dotenvy::dotenv().ok();

    Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_layered_applies_caller_defaults() {
        #[derive(Deserialize)]
        struct Settings {
            server: ServerConfig,
            name: String,
        }

        let settings: Settings = layered("SERVICE_CORE_TEST_UNSET")
            .set_default("name", "svc")
            .unwrap()
            .set_default("server.port", 9100)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.name, "svc");
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
    }
}
