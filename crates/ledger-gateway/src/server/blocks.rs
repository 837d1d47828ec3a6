use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;
use tracing::debug;

use ledger_gateway_core::format::blocks_response;
use ledger_gateway_core::resolve::resolve_blocks;

use super::error::AppError;
use super::SharedState;

// ==============================================================================
// Handlers
// ==============================================================================

/// `GET /blocks/`: the newest canonical blocks.
pub(super) async fn list_blocks(State(state): State<SharedState>) -> Result<Json<Value>, AppError> {
    debug!("GET blocks/");
    respond(&state, None).await
}

/// `GET /blocks/{token}`: `head`, a decimal height, or a hex block hash.
pub(super) async fn get_block(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    debug!(token = %token, "GET blocks/{{token}}");
    respond(&state, Some(&token)).await
}

async fn respond(state: &SharedState, token: Option<&str>) -> Result<Json<Value>, AppError> {
    let blocks = resolve_blocks(state.chain.as_ref(), token).await?;
    Ok(Json(blocks_response(&blocks)))
}
