pub mod chain;
pub mod error;
pub mod format;
pub mod memory;
pub mod reconcile;
pub mod resolve;
pub mod submit;
pub mod types;
pub mod wire;

#[cfg(test)]
pub(crate) mod test_util;

pub use chain::{ChainManager, PeerManager, PendingTransaction};
pub use error::CoreError;
pub use types::{AccountState, Address, Block, BlockHash, Bytes, PeerRecord, Transaction, TxHash, H256};
