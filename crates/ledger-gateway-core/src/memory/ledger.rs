use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::chain::{ChainManager, PendingTransaction};
use crate::error::CoreError;
use crate::types::{AccountState, Address, Block, BlockHash, Transaction, TxHash};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("unknown parent {parent} for block {block}")]
    UnknownParent { block: BlockHash, parent: BlockHash },

    #[error("block {0} carries a hash that does not match its header")]
    HashMismatch(BlockHash),

    #[error("block {0} lists transactions that were not supplied")]
    TransactionMismatch(BlockHash),

    #[error("block {block} claims height {number} but its parent is at {parent_number}")]
    HeightMismatch {
        block: BlockHash,
        number: u64,
        parent_number: u64,
    },
}

// ==============================================================================
// State
// ==============================================================================

struct LedgerState {
    blocks: HashMap<BlockHash, Block>,
    /// Canonical hashes indexed by height; last entry is the head.
    canonical: Vec<BlockHash>,
    committed: HashMap<TxHash, (Transaction, BlockHash)>,
    pending: Vec<Transaction>,
    /// Block being assembled from `pending` on top of the head.
    working: Option<Block>,
    coinbase: Address,
    accounts: HashMap<Address, AccountState>,
}

impl LedgerState {
    fn head(&self) -> &Block {
        let hash = self
            .canonical
            .last()
            .expect("canonical chain always contains genesis");
        &self.blocks[hash]
    }

    /// Walk back from `tip` and rebuild the canonical index.
    fn set_canonical_tip(&mut self, tip: BlockHash) {
        let mut chain = Vec::new();
        let mut cursor = self.blocks.get(&tip);
        while let Some(block) = cursor {
            chain.push(block.hash);
            cursor = if block.number == 0 {
                None
            } else {
                self.blocks.get(&block.prevhash)
            };
        }
        chain.reverse();
        self.canonical = chain;
    }

    fn insert_block(
        &mut self,
        block: Block,
        transactions: Vec<Transaction>,
    ) -> Result<bool, LedgerError> {
        if block.hash != block.compute_hash() {
            return Err(LedgerError::HashMismatch(block.hash));
        }
        let listed: Vec<TxHash> = transactions.iter().map(Transaction::hash).collect();
        if listed != block.transactions {
            return Err(LedgerError::TransactionMismatch(block.hash));
        }
        let Some(parent_number) = self.blocks.get(&block.prevhash).map(|p| p.number) else {
            return Err(LedgerError::UnknownParent {
                block: block.hash,
                parent: block.prevhash,
            });
        };
        if parent_number.checked_add(1) != Some(block.number) {
            return Err(LedgerError::HeightMismatch {
                block: block.hash,
                number: block.number,
                parent_number,
            });
        }

        for tx in transactions {
            self.committed.insert(tx.hash(), (tx, block.hash));
        }
        self.pending.retain(|tx| !block.transactions.contains(&tx.hash()));

        let hash = block.hash;
        let number = block.number;
        let new_head = number > self.head().number;
        self.blocks.insert(hash, block);

        if new_head {
            self.set_canonical_tip(hash);
            info!(block = %hash, number, "new head");
        } else {
            debug!(block = %hash, number, "side branch block");
        }
        self.rebuild_working();
        Ok(new_head)
    }

    fn rebuild_working(&mut self) {
        self.working = if self.pending.is_empty() {
            None
        } else {
            Some(Block::child_of(
                self.head(),
                self.coinbase,
                unix_now(),
                &self.pending,
            ))
        };
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ==============================================================================
// MemoryLedger
// ==============================================================================

/// In-memory chain collaborator.
///
/// Keeps every block it is given, follows the longest chain, and maintains a
/// committed transaction index plus a pending pool. Submissions arrive over
/// an unbounded channel and are admitted by [`MemoryLedger::admit_submissions`].
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
    submissions: mpsc::UnboundedSender<Transaction>,
}

impl MemoryLedger {
    /// Create a ledger rooted at `genesis`, returning the receiving end of
    /// its submission channel.
    pub fn new(genesis: Block) -> (Self, mpsc::UnboundedReceiver<Transaction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = LedgerState {
            canonical: vec![genesis.hash],
            blocks: HashMap::from([(genesis.hash, genesis)]),
            committed: HashMap::new(),
            pending: Vec::new(),
            working: None,
            coinbase: Address::default(),
            accounts: HashMap::new(),
        };
        let ledger = Self {
            state: RwLock::new(state),
            submissions: tx,
        };
        (ledger, rx)
    }

    /// Address credited by blocks sealed from the pending pool.
    pub async fn set_coinbase(&self, coinbase: Address) {
        let mut state = self.state.write().await;
        state.coinbase = coinbase;
        state.rebuild_working();
    }

    pub async fn set_account(&self, address: Address, account: AccountState) {
        self.state.write().await.accounts.insert(address, account);
    }

    /// Add an already-sealed block. The block becomes head when it is
    /// strictly higher than the current head; otherwise it is kept as a side
    /// branch. Returns whether the head changed.
    pub async fn commit_block(
        &self,
        block: Block,
        transactions: Vec<Transaction>,
    ) -> Result<bool, LedgerError> {
        self.state.write().await.insert_block(block, transactions)
    }

    /// Place a transaction in the pending pool, ignoring exact duplicates.
    pub async fn add_pending(&self, tx: Transaction) {
        let mut state = self.state.write().await;
        let hash = tx.hash();
        if state.pending.iter().any(|p| p.hash() == hash) {
            return;
        }
        state.pending.push(tx);
        state.rebuild_working();
    }

    /// Admit one submitted transaction. Returns `false` when it is already
    /// committed or already pending.
    pub async fn admit(&self, tx: Transaction) -> bool {
        let hash = tx.hash();
        let mut state = self.state.write().await;
        if state.committed.contains_key(&hash) || state.pending.iter().any(|p| p.hash() == hash) {
            debug!(tx = %hash, "submission already known");
            return false;
        }
        state.pending.push(tx);
        state.rebuild_working();
        info!(tx = %hash, "transaction admitted to pending pool");
        true
    }

    /// Drain the submission channel until every sender is gone.
    pub async fn admit_submissions(&self, mut rx: mpsc::UnboundedReceiver<Transaction>) {
        while let Some(tx) = rx.recv().await {
            self.admit(tx).await;
        }
    }

    pub async fn working_block(&self) -> Option<Block> {
        self.state.read().await.working.clone()
    }

    #[cfg(test)]
    pub(crate) async fn pending_len(&self) -> usize {
        self.state.read().await.pending.len()
    }

    /// Commit the working block, so pending transactions keep the block
    /// hash they were reported under. Returns `None` when the pool is empty.
    pub async fn seal_pending(&self) -> Option<Block> {
        let mut state = self.state.write().await;
        let block = state.working.clone()?;
        let transactions = state.pending.clone();
        match state.insert_block(block.clone(), transactions) {
            Ok(_) => Some(block),
            Err(err) => {
                warn!(%err, "failed to seal working block");
                None
            }
        }
    }
}

#[async_trait]
impl ChainManager for MemoryLedger {
    async fn get_head(&self) -> Result<Block, CoreError> {
        Ok(self.state.read().await.head().clone())
    }

    async fn get_recent_blocks(&self, count: usize) -> Result<Vec<Block>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .canonical
            .iter()
            .rev()
            .take(count)
            .map(|hash| state.blocks[hash].clone())
            .collect())
    }

    async fn canonical_hash_at(&self, height: u64) -> Result<Option<BlockHash>, CoreError> {
        let state = self.state.read().await;
        Ok(usize::try_from(height)
            .ok()
            .and_then(|h| state.canonical.get(h))
            .copied())
    }

    async fn get_block_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>, CoreError> {
        Ok(self.state.read().await.blocks.get(hash).cloned())
    }

    async fn find_committed_transaction(
        &self,
        hash: &TxHash,
    ) -> Result<Option<(Transaction, Block)>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .committed
            .get(hash)
            .map(|(tx, block_hash)| (tx.clone(), state.blocks[block_hash].clone())))
    }

    async fn find_pending_transaction(
        &self,
        hash: &TxHash,
    ) -> Result<Option<PendingTransaction>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .pending
            .iter()
            .find(|tx| tx.hash() == *hash)
            .map(|tx| PendingTransaction {
                transaction: tx.clone(),
                working_block: state.working.as_ref().map(|b| b.hash),
            }))
    }

    async fn is_on_canonical_branch(&self, block: &Block) -> Result<bool, CoreError> {
        let state = self.state.read().await;
        Ok(usize::try_from(block.number)
            .ok()
            .and_then(|h| state.canonical.get(h))
            .is_some_and(|hash| *hash == block.hash))
    }

    fn submit_transaction(&self, tx: Transaction) -> Result<(), CoreError> {
        self.submissions
            .send(tx)
            .map_err(|_| CoreError::Unavailable("transaction admission channel closed".into()))
    }

    async fn account_snapshot(&self, address: &Address) -> Result<AccountState, CoreError> {
        Ok(self
            .state
            .read()
            .await
            .accounts
            .get(address)
            .cloned()
            .unwrap_or_default())
    }
}
