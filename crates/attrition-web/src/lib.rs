//! HTTP front-ends for attrition scoring.
//!
//! - `GET /`: liveness message
//! - `POST /predict`: JSON profile in, JSON verdict out
//! - `GET /ui`, `POST /ui`: HTML form for interactive use
//!
//! Both front-ends share one [`ModelHandle`] through router state and run
//! the same [`attrition_ai::assess`] pipeline.

mod api;
mod form;

use anyhow::Context;
use attrition_ai::ModelHandle;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use api::HOME_MESSAGE;
pub use form::{FormValues, YesNo};

/// State shared by every handler. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    pub model: ModelHandle,
}

impl AppState {
    pub fn new(model: ModelHandle) -> Self {
        Self { model }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/predict", post(api::predict))
        .route("/ui", get(form::show).post(form::submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    let local = listener.local_addr().context("reading bound address")?;
    info!(addr = %local, "serving attrition API and form UI");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
