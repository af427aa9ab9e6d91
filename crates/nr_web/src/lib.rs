use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/newsroom", get(handlers::list_articles))
        .route("/health", post(handlers::health))
        .route("/ingest", post(handlers::ingest_article))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, addr: &str) -> nr_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| nr_core::Error::Config(format!("Failed to bind {}: {}", addr, e)))?;
    tracing::info!("🌐 Listening on {}", addr);

    axum::serve(listener, create_app(state))
        .await
        .map_err(|e| nr_core::Error::External(e.into()))
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use nr_core::{Error, Result};
}
