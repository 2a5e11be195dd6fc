use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::registry::StatusRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<StatusRegistry>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/status", get(handlers::get_status))
        .route("/api/status/:name", get(handlers::get_component))
        .route("/api/events", get(handlers::stream_events))
        .layer(CorsLayer::permissive())
        .with_state(state.registry)
}

pub async fn serve(state: AppState, listener: TcpListener) -> Result<()> {
    let app = create_router(state);
    log::info!("Status API listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
