//! Contacts API
//!
//! REST server for managing contact records.
//!
//! ## Endpoints
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | /contacts | 200, array of contacts |
//! | GET | /contacts/search?name=&email= | 200, array of contacts |
//! | GET | /contacts/:id | 200, contact |
//! | POST | /contacts | 201, created contact |
//! | PUT | /contacts/:id | 200, updated contact |
//! | DELETE | /contacts/:id | 200, confirmation |
//! | GET | /health | 200 or 503 |
//!
//! Errors are `{"message": "..."}` with 400 (validation), 404 (unknown id)
//! or 500 (store failure).
//!
//! ## Example
//!
//! ```rust,no_run
//! use contacts_api::{serve, ServerConfig, StoreBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig {
//!         store: StoreBackend::Memory,
//!         ..Default::default()
//!     };
//!     serve(config).await
//! }
//! ```

pub mod config;
pub mod handler;
pub mod telemetry;

pub use config::{LogFormat, ServerConfig, StoreBackend, DEFAULT_MAX_BODY_BYTES};
pub use handler::{
    create_router, ApiError, AppState, ErrorBody, HealthResponse, HealthStatus, MessageResponse,
};
pub use telemetry::init_tracing;

use anyhow::Context;
use axum::{extract::DefaultBodyLimit, middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Router with the standard middleware stack applied
pub fn build_app(state: AppState, max_body_bytes: usize) -> Router {
    create_router(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(handler::request_logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Run the server until Ctrl-C or SIGTERM, then flush the store
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let store = config.open_store()?;
    let state = AppState::new(Arc::clone(&store), config.validator());
    let app = build_app(state, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        store = store.name(),
        version = env!("CARGO_PKG_VERSION"),
        "Contacts service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    store.flush().await.context("failed to flush store")?;
    tracing::info!("Contacts service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
