//! HTTP JSON API server
//!
//! Routes are organized into modules:
//! - routes::transactions: CRUD, summary, CSV export, clear, import
//! - routes::view: paged and filtered transaction table
//! - routes::reports: category, monthly and goal reports
//! - routes::settings: configuration display

pub mod error;
pub mod routes;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use minibudget_config::Config;
use minibudget_core::Ledger;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};

/// Application state
///
/// Handlers that change data hold the ledger's write lock for the whole
/// read-modify-write cycle.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::reports::{api_report_categories, api_report_goal, api_report_monthly};
    use routes::settings::api_settings;
    use routes::transactions::{
        api_clear, api_export, api_import, api_summary, api_transaction_create, api_transaction_delete,
        api_transaction_update, api_transactions,
    };
    use routes::view::api_view;

    let cors = state.config.server.cors;

    let router = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/transactions", get(api_transactions).post(api_transaction_create))
        .route("/api/transactions/:id", put(api_transaction_update).delete(api_transaction_delete))
        .route("/api/summary", get(api_summary))
        .route("/api/export", get(api_export))
        .route("/api/clear", delete(api_clear))
        .route("/api/import", post(api_import))
        .route("/api/view", get(api_view))
        .route("/api/reports/categories", get(api_report_categories))
        .route("/api/reports/monthly", get(api_report_monthly))
        .route("/api/reports/goal", get(api_report_goal))
        .route("/api/settings", get(api_settings))
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Start the HTTP server
///
/// Binds to `server.host:server.port` and serves until ctrl-c.
///
/// # Arguments
///
/// * `config` - The application configuration
/// * `ledger` - The shared ledger state
pub async fn start_server(config: Config, ledger: Arc<RwLock<Ledger>>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { ledger, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting minibudget server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /api/transactions (list, create, update, delete)");
    log::info!("  - /api/summary, /api/export, /api/clear, /api/import");
    log::info!("  - /api/view (paged table)");
    log::info!("  - /api/reports/* (categories, monthly, goal)");
    log::info!("  - /api/settings (configuration)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
