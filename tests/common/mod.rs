use credit_ledger::api::{create_router, AppState};
use credit_ledger::services::LedgerService;
use std::sync::Arc;

/// Fresh engine for a test; every test owns its own volatile state.
#[allow(dead_code)]
pub fn new_service() -> Arc<LedgerService> {
    Arc::new(LedgerService::new())
}

/// Binds the API on an ephemeral port and returns its base URL.
#[allow(dead_code)]
pub async fn spawn_app() -> String {
    let state = AppState::new(new_service());
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server crashed");
    });

    format!("http://{}", addr)
}
