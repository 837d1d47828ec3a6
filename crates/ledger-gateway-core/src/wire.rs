//! Raw transaction wire codec.
//!
//! A transaction travels as the hex text of its bincode encoding
//! (fixed-width integers, no trailing bytes). The content hash is taken over
//! the decoded bytes, so the same transaction always hashes the same way
//! regardless of hex letter case or surrounding whitespace in the payload.

use bincode::Options;

use crate::error::CoreError;
use crate::types::Transaction;

/// Upper bound on a decoded transaction; also caps allocations made while
/// decoding length-prefixed fields.
pub const MAX_TX_BYTES: u64 = 128 * 1024;

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

pub fn encode(tx: &Transaction) -> Vec<u8> {
    codec()
        .serialize(tx)
        .expect("transaction fields are fixed-size or length-prefixed and always encode")
}

pub fn decode(bytes: &[u8]) -> Result<Transaction, CoreError> {
    codec()
        .with_limit(MAX_TX_BYTES)
        .deserialize(bytes)
        .map_err(|e| CoreError::InvalidTxData(e.to_string()))
}

pub fn encode_hex(tx: &Transaction) -> String {
    hex::encode(encode(tx))
}

pub fn decode_hex(payload: &str) -> Result<Transaction, CoreError> {
    let bytes = hex::decode(payload.trim())
        .map_err(|e| CoreError::InvalidTxData(format!("payload is not hex: {e}")))?;
    decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::make_tx;

    #[test]
    fn hex_payload_decodes_to_same_transaction() {
        let tx = make_tx(4);
        let payload = format!("  {}\n", encode_hex(&tx).to_uppercase());
        let decoded = decode_hex(&payload).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.hash(), tx.hash());
    }

    #[test]
    fn non_hex_payload_is_invalid_tx_data() {
        let err = decode_hex("not-hex").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTxData(ref msg) if msg.contains("not hex")));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let bytes = encode(&make_tx(4));
        let err = decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTxData(_)));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = encode(&make_tx(4));
        bytes.push(0);
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn oversized_length_prefix_is_rejected_without_allocating() {
        // nonce, gasprice, startgas, to, value, then a huge data length.
        let mut bytes = vec![0u8; 8 * 3 + 20 + 8];
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(decode(&bytes).is_err());
    }
}
