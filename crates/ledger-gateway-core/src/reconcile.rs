//! Transaction lookup across the committed index and the pending pool.
//!
//! The committed index is authoritative: a transaction that has been mined is
//! never reported as pending, even while a stale copy is still in the pool.

use tracing::debug;

use crate::chain::ChainManager;
use crate::error::CoreError;
use crate::types::{Block, BlockHash, Transaction, TxHash};

/// A transaction as the gateway reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionView {
    pub transaction: Transaction,
    pub hash: TxHash,
    /// Containing block when committed, the working block when pending.
    pub block: Option<BlockHash>,
    pub confirmations: u64,
}

/// Decode a hex transaction hash. Unlike block identifiers, a malformed
/// transaction hash is a client error.
pub fn parse_tx_hash(token: &str) -> Result<TxHash, CoreError> {
    token
        .parse()
        .map_err(|e| CoreError::InvalidTxHash(format!("{token}: {e}")))
}

/// Canonical blocks built on top of `block`, or 0 when `block` is off the
/// canonical branch.
pub fn confirmations(head: &Block, block: &Block, on_canonical_branch: bool) -> u64 {
    if on_canonical_branch {
        head.number.saturating_sub(block.number)
    } else {
        0
    }
}

/// Look up the transaction named by the path token. Misses report `token`
/// verbatim.
pub async fn lookup_transaction(
    chain: &dyn ChainManager,
    token: &str,
) -> Result<TransactionView, CoreError> {
    let hash = &parse_tx_hash(token)?;
    if let Some((transaction, block)) = chain.find_committed_transaction(hash).await? {
        let head = chain.get_head().await?;
        let canonical = chain.is_on_canonical_branch(&block).await?;
        let confirmations = confirmations(&head, &block, canonical);
        debug!(
            tx = %hash,
            block = %block.hash,
            canonical,
            confirmations,
            "transaction found in committed index"
        );
        return Ok(TransactionView {
            transaction,
            hash: *hash,
            block: Some(block.hash),
            confirmations,
        });
    }

    if let Some(pending) = chain.find_pending_transaction(hash).await? {
        debug!(tx = %hash, "transaction found in pending pool");
        return Ok(TransactionView {
            transaction: pending.transaction,
            hash: *hash,
            block: pending.working_block,
            confirmations: 0,
        });
    }

    Err(CoreError::TxNotFound(token.to_owned()))
}
