use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::api::error::ApiError;
use crate::lifecycle::StatusSnapshot;
use crate::registry::{RegistrySnapshot, StatusRegistry};
use crate::types::{CurrentState, StateId};

/// Load-balancer probe: 503 once the process is red overall.
pub async fn health_check(
    State(registry): State<Arc<StatusRegistry>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let overall = registry.overall();
    let code = if overall.state == CurrentState::State(StateId::Red) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        code,
        Json(serde_json::json!({
            "status": overall.state,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

pub async fn get_status(State(registry): State<Arc<StatusRegistry>>) -> Json<RegistrySnapshot> {
    Json(registry.to_serializable())
}

pub async fn get_component(
    State(registry): State<Arc<StatusRegistry>>,
    Path(name): Path<String>,
) -> Result<Json<StatusSnapshot>, ApiError> {
    let status = registry.get(&name)?;
    Ok(Json(status.snapshot()))
}

pub async fn stream_events(
    State(registry): State<Arc<StatusRegistry>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut changes = registry.subscribe();

    let stream = async_stream::stream! {
        loop {
            match changes.recv().await {
                Ok(change) => match Event::default().event("status").json_data(&change) {
                    Ok(event) => {
                        yield Ok::<Event, Infallible>(event);
                    }
                    Err(e) => log::warn!("Failed to encode status change: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Status event stream lagged, skipped {} changes", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
