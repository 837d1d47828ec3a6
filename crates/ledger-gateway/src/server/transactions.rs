use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Json;
use serde_json::Value;
use tracing::debug;

use ledger_gateway_core::format::transactions_response;
use ledger_gateway_core::reconcile::lookup_transaction;
use ledger_gateway_core::submit;

use super::error::AppError;
use super::SharedState;

// ==============================================================================
// Handlers
// ==============================================================================

/// `PUT /transactions/`: body is the hex wire encoding. Answers `303 See
/// Other` pointing at the transaction's own resource.
pub(super) async fn submit_transaction(
    State(state): State<SharedState>,
    body: String,
) -> Result<Redirect, AppError> {
    debug!(bytes = body.len(), "PUT transactions/");
    let hash = submit::submit_transaction(state.chain.as_ref(), &body)?;
    Ok(Redirect::to(&state.resource_path(&format!("/transactions/{hash}"))))
}

/// `GET /transactions/{hash}`: committed index first, then the pending pool.
pub(super) async fn get_transaction(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    debug!(token = %token, "GET transactions/{{hash}}");
    let view = lookup_transaction(state.chain.as_ref(), &token).await?;
    Ok(Json(transactions_response(std::slice::from_ref(&view))))
}
