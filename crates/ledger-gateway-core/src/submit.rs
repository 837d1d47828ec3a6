//! Raw transaction submission.

use tracing::debug;

use crate::chain::ChainManager;
use crate::error::CoreError;
use crate::types::TxHash;
use crate::wire;

/// Decode a hex wire payload and notify the chain collaborator. Returns the
/// hash the transaction will be retrievable under; whether the collaborator
/// admits it is decided later and is not visible here.
pub fn submit_transaction(chain: &dyn ChainManager, payload: &str) -> Result<TxHash, CoreError> {
    let tx = wire::decode_hex(payload)?;
    let hash = tx.hash();
    debug!(tx = %hash, "submitting transaction");
    chain.submit_transaction(tx)?;
    Ok(hash)
}
