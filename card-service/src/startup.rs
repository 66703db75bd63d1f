use axum::Router;
use secrecy::ExposeSecret;
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{CardConfig, StoreBackend};
use crate::services::{CardService, CardStore, InMemoryCardStore, InMemoryCredentialStore, PgCardStore};
use crate::{build_router, AppState};

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: CardConfig) -> Result<Self, AppError> {
        let store = build_store(&config).await?;
        let credentials = Arc::new(InMemoryCredentialStore::from_settings(&config.auth.users)?);

        let state = AppState {
            config: config.clone(),
            credentials,
            cards: CardService::new(store),
        };

        let app: Router = build_router(state);

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(address = %addr, port = port, "Listening");

        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn build_store(config: &CardConfig) -> Result<Arc<dyn CardStore>, AppError> {
    let settings = &config.store;

    match settings.backend {
        StoreBackend::Memory => {
            tracing::info!(seed = settings.seed.len(), "Using in-memory card store");
            Ok(Arc::new(InMemoryCardStore::with_cards(settings.seed.iter().cloned())))
        }
        StoreBackend::Postgres => {
            let url = settings.database_url.as_ref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "store.database_url is required for the postgres backend"
                ))
            })?;

            let store = PgCardStore::connect(
                url.expose_secret(),
                settings.max_connections,
                settings.min_connections,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to PostgreSQL: {}", e);
                e
            })?;
            store.run_migrations().await?;
            if !settings.seed.is_empty() {
                store.seed(&settings.seed).await?;
            }

            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
