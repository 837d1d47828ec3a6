//! Domain types shared by the resolver, reconciler and formatter.
//!
//! Blocks, transactions, accounts and peers are owned by the chain and peer
//! collaborators; the gateway only reads them for the lifetime of a request.
//! Fixed-width hashes are raw bytes internally and lowercase hex externally.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

// ==============================================================================
// Fixed-Width Byte Strings
// ==============================================================================

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        pub struct $name(pub [u8; $len]);

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl FromStr for $name {
            type Err = hex::FromHexError;

            /// Parses exactly twice the byte width in hex digits, no `0x` prefix.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut bytes = [0u8; $len];
                hex::decode_to_slice(s, &mut bytes)?;
                Ok(Self(bytes))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }
    };
}

fixed_bytes!(
    /// A 32-byte digest: block hashes, transaction hashes, state roots.
    H256,
    32
);

fixed_bytes!(
    /// A 20-byte account address.
    Address,
    20
);

pub type BlockHash = H256;
pub type TxHash = H256;

impl H256 {
    /// SHA-256 of `data`.
    pub fn digest(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }
}

/// Variable-length byte payload (call data, contract code).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

// ==============================================================================
// Transaction
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub nonce: u64,
    pub gasprice: u64,
    pub startgas: u64,
    pub to: Address,
    pub value: u64,
    pub data: Bytes,
    pub v: u8,
    pub r: H256,
    pub s: H256,
}

impl Transaction {
    /// Content hash: SHA-256 over the wire encoding.
    pub fn hash(&self) -> TxHash {
        H256::digest(&crate::wire::encode(self))
    }

    pub fn to_dict(&self) -> Map<String, Value> {
        let mut dict = Map::new();
        dict.insert("nonce".into(), self.nonce.into());
        dict.insert("gasprice".into(), self.gasprice.into());
        dict.insert("startgas".into(), self.startgas.into());
        dict.insert("to".into(), self.to.to_string().into());
        dict.insert("value".into(), self.value.into());
        dict.insert("data".into(), self.data.to_string().into());
        dict.insert("v".into(), self.v.into());
        dict.insert("r".into(), self.r.to_string().into());
        dict.insert("s".into(), self.s.to_string().into());
        dict
    }
}

// ==============================================================================
// Block
// ==============================================================================

pub const GENESIS_DIFFICULTY: u64 = 131_072;
pub const GENESIS_GAS_LIMIT: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Height; genesis is 0.
    pub number: u64,
    pub hash: BlockHash,
    pub prevhash: BlockHash,
    pub coinbase: Address,
    pub difficulty: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub nonce: u64,
    pub state_root: H256,
    pub timestamp: u64,
    pub transactions: Vec<TxHash>,
}

impl Block {
    pub fn genesis() -> Self {
        let mut block = Self {
            number: 0,
            hash: H256::default(),
            prevhash: H256::default(),
            coinbase: Address::default(),
            difficulty: GENESIS_DIFFICULTY,
            gas_limit: GENESIS_GAS_LIMIT,
            gas_used: 0,
            nonce: 0,
            state_root: H256::default(),
            timestamp: 0,
            transactions: Vec::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Build and seal a block on top of `parent` carrying `transactions`.
    pub fn child_of(
        parent: &Block,
        coinbase: Address,
        timestamp: u64,
        transactions: &[Transaction],
    ) -> Self {
        let mut block = Self {
            number: parent.number + 1,
            hash: H256::default(),
            prevhash: parent.hash,
            coinbase,
            difficulty: parent.difficulty,
            gas_limit: parent.gas_limit,
            gas_used: transactions
                .iter()
                .fold(0u64, |acc, tx| acc.saturating_add(tx.startgas)),
            nonce: 0,
            state_root: parent.state_root,
            timestamp,
            transactions: transactions.iter().map(Transaction::hash).collect(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// SHA-256 over every header field except `hash` itself.
    pub fn compute_hash(&self) -> BlockHash {
        let mut hasher = Sha256::new();
        hasher.update(self.number.to_be_bytes());
        hasher.update(self.prevhash.0);
        hasher.update(self.coinbase.0);
        hasher.update(self.difficulty.to_be_bytes());
        hasher.update(self.gas_limit.to_be_bytes());
        hasher.update(self.gas_used.to_be_bytes());
        hasher.update(self.nonce.to_be_bytes());
        hasher.update(self.state_root.0);
        hasher.update(self.timestamp.to_be_bytes());
        for tx in &self.transactions {
            hasher.update(tx.0);
        }
        H256(hasher.finalize().into())
    }

    pub fn to_dict(&self) -> Map<String, Value> {
        let mut dict = Map::new();
        dict.insert("number".into(), self.number.into());
        dict.insert("hash".into(), self.hash.to_string().into());
        dict.insert("prevhash".into(), self.prevhash.to_string().into());
        dict.insert("coinbase".into(), self.coinbase.to_string().into());
        dict.insert("difficulty".into(), self.difficulty.into());
        dict.insert("gas_limit".into(), self.gas_limit.into());
        dict.insert("gas_used".into(), self.gas_used.into());
        dict.insert("nonce".into(), self.nonce.into());
        dict.insert("state_root".into(), self.state_root.to_string().into());
        dict.insert("timestamp".into(), self.timestamp.into());
        dict.insert(
            "transactions".into(),
            Value::Array(
                self.transactions
                    .iter()
                    .map(|tx| Value::String(tx.to_string()))
                    .collect(),
            ),
        );
        dict
    }
}

// ==============================================================================
// Account State
// ==============================================================================

/// Account snapshot at the current head. Unknown accounts are the zero state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountState {
    pub nonce: u64,
    pub balance: u64,
    pub code: Bytes,
    pub storage: BTreeMap<H256, H256>,
}

impl AccountState {
    pub fn to_dict(&self, address: &Address) -> Map<String, Value> {
        let storage: Map<String, Value> = self
            .storage
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();

        let mut dict = Map::new();
        dict.insert("address".into(), address.to_string().into());
        dict.insert("nonce".into(), self.nonce.into());
        dict.insert("balance".into(), self.balance.into());
        dict.insert("code".into(), self.code.to_string().into());
        dict.insert("storage".into(), Value::Object(storage));
        dict
    }
}

// ==============================================================================
// Peer Record
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerRecord {
    pub ip: IpAddr,
    pub port: u16,
    pub node_id: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ParsePeerError {
    #[error("expected `<node_id_hex>@<ip>:<port>`")]
    MissingSeparator,

    #[error("invalid node id: {0}")]
    NodeId(#[from] hex::FromHexError),

    #[error("invalid socket address: {0}")]
    Address(#[from] std::net::AddrParseError),
}

impl FromStr for PeerRecord {
    type Err = ParsePeerError;

    /// Parses the enode-style `<node_id_hex>@<ip>:<port>` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (node_id, addr) = s.split_once('@').ok_or(ParsePeerError::MissingSeparator)?;
        let node_id = hex::decode(node_id)?;
        let addr: SocketAddr = addr.parse()?;
        Ok(Self {
            ip: addr.ip(),
            port: addr.port(),
            node_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[test]
    fn h256_parses_exact_width_hex_only() {
        let hex_str = "ab".repeat(32);
        let hash: H256 = hex_str.parse().unwrap();
        assert_eq!(hash.0, [0xab; 32]);
        assert_eq!(hash.to_string(), hex_str);

        assert!("ab".repeat(31).parse::<H256>().is_err());
        assert!("abc".parse::<H256>().is_err());
        assert!("zz".repeat(32).parse::<H256>().is_err());
        assert!(format!("0x{}", "ab".repeat(31)).parse::<H256>().is_err());
    }

    #[test]
    fn block_hash_covers_header_fields() {
        let genesis = Block::genesis();
        assert_eq!(genesis.hash, genesis.compute_hash());

        let a = Block::child_of(&genesis, address_from_byte(1), 10, &[]);
        let b = Block::child_of(&genesis, address_from_byte(2), 10, &[]);
        assert_eq!(a.number, 1);
        assert_eq!(a.prevhash, genesis.hash);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn child_block_lists_transaction_hashes_in_order() {
        let genesis = Block::genesis();
        let txs = vec![make_tx(1), make_tx(2)];
        let block = Block::child_of(&genesis, Address::default(), 1, &txs);
        assert_eq!(block.transactions, vec![txs[0].hash(), txs[1].hash()]);
        assert_eq!(block.gas_used, txs[0].startgas + txs[1].startgas);
    }

    #[test]
    fn transaction_hash_depends_on_every_field() {
        let tx = make_tx(7);
        let mut changed = tx.clone();
        changed.v ^= 1;
        assert_ne!(tx.hash(), changed.hash());
        assert_eq!(tx.hash(), tx.clone().hash());
    }

    #[test]
    fn account_dict_hex_encodes_storage() {
        let mut account = AccountState {
            nonce: 3,
            balance: 1_000,
            code: Bytes(vec![0x60, 0x00]),
            ..Default::default()
        };
        account.storage.insert(H256([1; 32]), H256([2; 32]));

        let dict = account.to_dict(&address_from_byte(9));
        assert_eq!(dict["code"], "6000");
        assert_eq!(dict["storage"][&"01".repeat(32)], "02".repeat(32));
        assert_eq!(dict["address"], format!("09{}", "00".repeat(19)));
    }

    #[test]
    fn peer_record_parses_enode_style() {
        let peer: PeerRecord = format!("{}@10.0.0.1:30303", "aa".repeat(64)).parse().unwrap();
        assert_eq!(peer.ip, "10.0.0.1".parse::<IpAddr>().unwrap());
        assert_eq!(peer.port, 30303);
        assert_eq!(peer.node_id, vec![0xaa; 64]);

        let v6: PeerRecord = "beef@[::1]:1".parse().unwrap();
        assert_eq!(v6.ip, "::1".parse::<IpAddr>().unwrap());

        assert!(matches!(
            "10.0.0.1:30303".parse::<PeerRecord>(),
            Err(ParsePeerError::MissingSeparator)
        ));
        assert!(matches!(
            "xyz@10.0.0.1:30303".parse::<PeerRecord>(),
            Err(ParsePeerError::NodeId(_))
        ));
        assert!(matches!(
            "beef@10.0.0.1".parse::<PeerRecord>(),
            Err(ParsePeerError::Address(_))
        ));
    }
}
