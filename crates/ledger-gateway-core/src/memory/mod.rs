//! In-memory collaborators.
//!
//! Reference implementations of [`ChainManager`](crate::chain::ChainManager)
//! and [`PeerManager`](crate::chain::PeerManager) used by the gateway binary
//! on a standalone devnet and by tests.

mod ledger;
mod peers;

pub use ledger::{LedgerError, MemoryLedger};
pub use peers::PeerDirectory;
