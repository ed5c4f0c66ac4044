//! csvsheet API Server implementation
//!
//! HTTP upload API using Axum. Clients POST raw CSV bytes and receive either a
//! JSON preview of the parsed table or the converted workbook.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::convert::Converter;
use crate::excel::DEFAULT_SHEET_NAME;

/// Default upload limit: 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// API Server configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub sheet_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

/// Shared application state (read-only across requests)
#[derive(Clone, Debug)]
pub struct AppState {
    pub version: String,
    pub converter: Converter,
}

impl AppState {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            converter: Converter::with_sheet_name(config.sheet_name.clone()),
        }
    }
}

/// Build the router with all routes and middleware
pub fn build_router(config: &ApiConfig) -> Router {
    let state = Arc::new(AppState::from_config(config));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Conversion endpoints
        .route("/api/v1/preview", post(handlers::preview))
        .route("/api/v1/convert", post(handlers::convert))
        // State and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csvsheet=info,tower_http=info".into()),
        )
        .init();

    let app = build_router(&config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📊 csvsheet API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/preview, /api/v1/convert");
    info!(
        "   Sheet name: {}, upload limit: {} bytes",
        config.sheet_name, config.max_upload_bytes
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("csvsheet API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
