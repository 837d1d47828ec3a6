//! Collaborator interfaces consumed by the gateway.
//!
//! The ledger-state component ([`ChainManager`]) and the network-membership
//! component ([`PeerManager`]) live outside this crate. Implementations must
//! tolerate concurrent readers; the gateway itself takes no locks and calls
//! each method at most once per logical lookup.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::{AccountState, Address, Block, BlockHash, PeerRecord, Transaction, TxHash};

/// A transaction found in the staging pool, with the block the collaborator
/// is currently assembling from the pool (if any).
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    pub transaction: Transaction,
    pub working_block: Option<BlockHash>,
}

/// Query and submission surface of the ledger-state component.
///
/// Every method may fail with [`CoreError::Unavailable`] when the component
/// cannot answer; absence is reported through `Option`, never through an
/// error.
#[async_trait]
pub trait ChainManager: Send + Sync {
    /// Current canonical tip.
    async fn get_head(&self) -> Result<Block, CoreError>;

    /// Up to `count` canonical blocks, newest first.
    async fn get_recent_blocks(&self, count: usize) -> Result<Vec<Block>, CoreError>;

    /// Hash of the canonical block at `height`.
    async fn canonical_hash_at(&self, height: u64) -> Result<Option<BlockHash>, CoreError>;

    async fn get_block_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>, CoreError>;

    /// Canonical block at `height`: hash-at-height, then fetch by hash.
    async fn get_block_by_height(&self, height: u64) -> Result<Option<Block>, CoreError> {
        match self.canonical_hash_at(height).await? {
            Some(hash) => self.get_block_by_hash(&hash).await,
            None => Ok(None),
        }
    }

    /// Look up a transaction in the committed index, with its containing block.
    async fn find_committed_transaction(
        &self,
        hash: &TxHash,
    ) -> Result<Option<(Transaction, Block)>, CoreError>;

    /// Look up a transaction in the pending staging pool by exact hash.
    async fn find_pending_transaction(
        &self,
        hash: &TxHash,
    ) -> Result<Option<PendingTransaction>, CoreError>;

    async fn is_on_canonical_branch(&self, block: &Block) -> Result<bool, CoreError>;

    /// Hand a transaction to the collaborator's admission channel. This is a
    /// notification: admission happens later, and its outcome is not
    /// reported back.
    fn submit_transaction(&self, tx: Transaction) -> Result<(), CoreError>;

    /// Account state at the current head.
    async fn account_snapshot(&self, address: &Address) -> Result<AccountState, CoreError>;
}

/// Read surface of the network-membership component.
#[async_trait]
pub trait PeerManager: Send + Sync {
    async fn connected_peers(&self) -> Result<Vec<PeerRecord>, CoreError>;

    async fn known_peers(&self) -> Result<Vec<PeerRecord>, CoreError>;
}
