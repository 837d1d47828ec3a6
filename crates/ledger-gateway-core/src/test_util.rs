//! Shared builders for `ledger-gateway-core` unit tests.

use tokio::sync::mpsc;

use crate::chain::ChainManager;
use crate::memory::MemoryLedger;
use crate::types::{Address, Block, Bytes, Transaction, H256};

pub fn address_from_byte(b: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = b;
    Address(bytes)
}

/// A transaction that differs from `make_tx(m)` for every `m != n`.
pub fn make_tx(n: u8) -> Transaction {
    Transaction {
        nonce: u64::from(n),
        gasprice: 10,
        startgas: 21_000,
        to: address_from_byte(n),
        value: 1_000 * u64::from(n),
        data: Bytes(vec![n, 0xff]),
        v: 27,
        r: H256([n; 32]),
        s: H256([0x11; 32]),
    }
}

/// Commit an empty block on top of the head.
pub async fn push_empty_block(ledger: &MemoryLedger) -> Block {
    mine_on_head(ledger, Vec::new()).await
}

/// Commit a block carrying `txs` on top of the head.
pub async fn mine_on_head(ledger: &MemoryLedger, txs: Vec<Transaction>) -> Block {
    let head = ledger.get_head().await.unwrap();
    let block = Block::child_of(&head, address_from_byte(0x01), head.timestamp + 1, &txs);
    assert!(ledger.commit_block(block.clone(), txs).await.unwrap());
    block
}

pub async fn extend_chain(ledger: &MemoryLedger, count: usize) {
    for _ in 0..count {
        push_empty_block(ledger).await;
    }
}

/// A ledger whose canonical chain runs from genesis to height `height`.
pub async fn ledger_with_chain(
    height: usize,
) -> (MemoryLedger, mpsc::UnboundedReceiver<Transaction>) {
    let (ledger, rx) = MemoryLedger::new(Block::genesis());
    extend_chain(&ledger, height).await;
    (ledger, rx)
}
