//! Folio Server - HTTP surface for the contact form
//!
//! Routes:
//! - `POST /api/contact` -> submission result JSON
//! - `GET /healthz` -> 200 OK "ok"
//!
//! The contact route accepts urlencoded, multipart and JSON bodies and hands
//! the fields to a shared [`SubmissionHandler`].

pub mod contact;
pub mod error;
pub mod middleware;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use folio_core::{PersistenceSink, SubmissionHandler};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub use error::{Result, ServerError};

/// Default request body cap for the contact route
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:8080`
    pub bind: String,
    /// Maximum accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| ServerError::InvalidBind {
                bind: self.bind.clone(),
                message: format!("{}", e),
            })
    }
}

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<SubmissionHandler<dyn PersistenceSink>>,
}

impl AppState {
    pub fn new(handler: SubmissionHandler<dyn PersistenceSink>) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// State around a handler with default rules over `sink`
    pub fn with_sink(sink: Arc<dyn PersistenceSink>) -> Self {
        Self::new(SubmissionHandler::new(sink))
    }
}

/// Build the application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/contact", post(contact::submit_contact))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Bind and serve until Ctrl-C / SIGTERM
pub async fn serve(state: AppState, config: ServerConfig) -> Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local = listener.local_addr().map_err(ServerError::Io)?;

    info!(addr = %local, sink = state.handler.sink().name(), "contact server listening");

    let app = build_router(state, &config);
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(ServerError::Io)?;

    info!("contact server stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
