use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;
use tracing::debug;

use ledger_gateway_core::format::accounts_response;
use ledger_gateway_core::{Address, CoreError};

use super::error::AppError;
use super::SharedState;

/// `GET /accounts/`: enumeration is not supported; always an empty list.
pub(super) async fn list_accounts() -> Json<Value> {
    debug!("GET accounts/");
    Json(accounts_response(&[]))
}

/// `GET /accounts/{address}`: account state at the current head.
pub(super) async fn get_account(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    debug!(address = %token, "GET accounts/{{address}}");
    let address: Address = token
        .parse()
        .map_err(|e| CoreError::InvalidAddress(format!("{token}: {e}")))?;
    let account = state.chain.account_snapshot(&address).await?;
    Ok(Json(accounts_response(&[(address, account)])))
}
