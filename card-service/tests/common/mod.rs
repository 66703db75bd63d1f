use card_service::config::{AuthSettings, CardConfig, StoreBackend, StoreSettings, UserSettings};
use card_service::models::Card;
use card_service::startup::Application;
use rust_decimal::Decimal;
use secrecy::Secret;
use service_core::config::ServerConfig;
use service_core::observability::LogFormat;

pub const OWEN: (&str, &str) = ("Owen", "abc123");
pub const KUMAR: (&str, &str) = ("Kumar", "xyz789");
pub const CHRIS: (&str, &str) = ("Chris", "qrs456");

pub struct TestApp {
    pub address: String,
    pub port: u16,
    client: reqwest::Client,
}

fn user(name: &str, password: &str, role: &str) -> UserSettings {
    UserSettings {
        name: name.to_string(),
        password: Secret::new(password.to_string()),
        roles: vec![role.to_string()],
    }
}

fn card(id: i64, amount: Decimal, owner: &str) -> Card {
    Card {
        id,
        amount,
        owner: owner.to_string(),
    }
}

pub fn test_config() -> CardConfig {
    CardConfig {
        service_name: "card-service-test".to_string(),
        log_level: "warn".to_string(),
        log_format: LogFormat::Pretty,
        otlp_endpoint: None,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port for testing
        },
        auth: AuthSettings {
            required_role: "CARD-OWNER".to_string(),
            users: vec![
                user(OWEN.0, OWEN.1, "CARD-OWNER"),
                user(KUMAR.0, KUMAR.1, "CARD-OWNER"),
                user(CHRIS.0, CHRIS.1, "NO-CARD"),
            ],
        },
        store: StoreSettings {
            backend: StoreBackend::Memory,
            database_url: None,
            max_connections: 5,
            min_connections: 1,
            seed: vec![
                card(99, Decimal::new(12345, 2), "Owen"),
                card(100, Decimal::new(100, 2), "Owen"),
                card(101, Decimal::new(15000, 2), "Owen"),
                card(102, Decimal::new(20000, 2), "Kumar"),
            ],
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: CardConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn get(&self, path: &str, (user, password): (&str, &str)) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .basic_auth(user, Some(password))
    }

    pub fn post(&self, path: &str, (user, password): (&str, &str)) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .basic_auth(user, Some(password))
    }

    pub fn put(&self, path: &str, (user, password): (&str, &str)) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .basic_auth(user, Some(password))
    }

    pub fn delete(&self, path: &str, (user, password): (&str, &str)) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .basic_auth(user, Some(password))
    }
}
