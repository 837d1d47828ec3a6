use axum::extract::State;
use axum::Json;
use serde_json::Value;
use tracing::debug;

use ledger_gateway_core::format::peers_response;

use super::error::AppError;
use super::SharedState;

pub(super) async fn connected_peers(
    State(state): State<SharedState>,
) -> Result<Json<Value>, AppError> {
    debug!("GET peers/connected");
    let peers = state.peers.connected_peers().await?;
    Ok(Json(peers_response(&peers)))
}

pub(super) async fn known_peers(State(state): State<SharedState>) -> Result<Json<Value>, AppError> {
    debug!("GET peers/known");
    let peers = state.peers.known_peers().await?;
    Ok(Json(peers_response(&peers)))
}
