use card_service::{config::CardConfig, startup::Application};
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Fail fast on bad configuration
    let config = CardConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.log_format,
        config.otlp_endpoint.as_deref(),
    )?;
    init_metrics();

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.store.backend,
        "Starting card service"
    );

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}
