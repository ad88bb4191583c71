//! Strike Hours API server
//!
//! HTTP API over the cached month data: search, report, artifact download.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::cache::MonthDataCache;
use crate::config::Config;
use crate::loader::SpreadsheetLoader;

/// API Server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub app: Config,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            app: Config::default(),
        }
    }
}

impl ApiConfig {
    pub fn address(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    pub version: String,
    pub config: Config,
    pub cache: MonthDataCache,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let cache = MonthDataCache::new(SpreadsheetLoader::from_config(&config));
        Self::with_cache(config, cache)
    }

    pub fn with_cache(config: Config, cache: MonthDataCache) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            cache,
        }
    }
}

/// Routes, CORS and request tracing around a shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        .route("/api/v1/months", get(handlers::months))
        .route("/api/v1/search", get(handlers::search))
        .route("/api/v1/report", get(handlers::report))
        .route("/api/v1/report/xlsx", get(handlers::report_xlsx))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strike_hours=info,tower_http=info".into()),
        )
        .init();

    let addr = config.address()?;
    let state = Arc::new(AppState::new(config.app));

    // Warm the cache off the runtime; a missing file only logs
    let preload = Arc::clone(&state);
    let loaded = tokio::task::spawn_blocking(move || preload.cache.get().is_some()).await?;
    info!(
        source = %state.config.source.display(),
        loaded,
        "month data preload finished"
    );

    let app = build_router(state);

    info!("Strike Hours API starting on http://{}", addr);
    info!("   Endpoints: /api/v1/months, /api/v1/search, /api/v1/report, /api/v1/report/xlsx");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Strike Hours API shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
