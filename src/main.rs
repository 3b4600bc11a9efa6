use credit_ledger::api::{create_router, AppState};
use credit_ledger::config::Settings;
use credit_ledger::observability::{init_logging, init_metrics, LogConfig, LogFormat};
use credit_ledger::services::LedgerService;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;

    // Initialize logging
    init_logging(&LogConfig {
        level: settings.application.log_level.clone(),
        format: LogFormat::from(settings.application.log_format.as_str()),
        ..LogConfig::default()
    });
    info!("Configuration loaded");

    // Initialize metrics
    let metrics_handle = init_metrics();
    info!("Metrics recorder installed");

    // The ledger is volatile: every start begins with an empty registry.
    let service = Arc::new(LedgerService::new());
    let state = AppState::new(service).with_metrics(metrics_handle);
    let router = create_router(state);

    let addr = format!("{}:{}", settings.application.host, settings.application.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Credit ledger listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
