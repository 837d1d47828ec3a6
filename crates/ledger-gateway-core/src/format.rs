//! Response shaping.
//!
//! Every response body is a JSON object with one plural key whose value is
//! the list of per-object dicts, in input order. `serde_json::Map` is
//! `BTreeMap`-backed (the `preserve_order` feature is not enabled anywhere in
//! the workspace), so keys come out sorted and identical inputs serialize to
//! identical bytes.

use serde_json::{Map, Value};

use crate::reconcile::TransactionView;
use crate::types::{AccountState, Address, Block, PeerRecord};

fn wrap(key: &str, items: Vec<Value>) -> Value {
    let mut body = Map::new();
    body.insert(key.to_owned(), Value::Array(items));
    Value::Object(body)
}

pub fn blocks_response(blocks: &[Block]) -> Value {
    wrap(
        "blocks",
        blocks.iter().map(|b| Value::Object(b.to_dict())).collect(),
    )
}

pub fn transaction_dict(view: &TransactionView) -> Map<String, Value> {
    let mut dict = view.transaction.to_dict();
    dict.insert("hash".into(), view.hash.to_string().into());
    dict.insert(
        "block".into(),
        view.block
            .map_or(Value::Null, |hash| Value::String(hash.to_string())),
    );
    dict.insert("confirmations".into(), view.confirmations.into());
    dict
}

pub fn transactions_response(views: &[TransactionView]) -> Value {
    wrap(
        "transactions",
        views
            .iter()
            .map(|v| Value::Object(transaction_dict(v)))
            .collect(),
    )
}

pub fn peer_dict(peer: &PeerRecord) -> Map<String, Value> {
    let mut dict = Map::new();
    dict.insert("ip".into(), peer.ip.to_string().into());
    dict.insert("port".into(), peer.port.into());
    dict.insert("node_id".into(), hex::encode(&peer.node_id).into());
    dict
}

pub fn peers_response(peers: &[PeerRecord]) -> Value {
    wrap(
        "peers",
        peers.iter().map(|p| Value::Object(peer_dict(p))).collect(),
    )
}

pub fn accounts_response(accounts: &[(Address, AccountState)]) -> Value {
    wrap(
        "accounts",
        accounts
            .iter()
            .map(|(address, state)| Value::Object(state.to_dict(address)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use crate::types::H256;

    fn keys(value: &Value) -> Vec<&str> {
        value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn block_keys_are_sorted_regardless_of_insertion_order() {
        let block = Block::genesis();
        let body = blocks_response(std::slice::from_ref(&block));
        let dict = &body["blocks"][0];

        let mut sorted = keys(dict);
        sorted.sort_unstable();
        assert_eq!(keys(dict), sorted);

        let text = serde_json::to_string(&body).unwrap();
        assert!(text.starts_with(r#"{"blocks":[{"coinbase":"#), "{text}");
    }

    #[test]
    fn identical_inputs_serialize_byte_identically() {
        let genesis = Block::genesis();
        let child = Block::child_of(&genesis, address_from_byte(3), 77, &[make_tx(1)]);
        let blocks = vec![child.clone(), genesis.clone()];

        let first = serde_json::to_vec(&blocks_response(&blocks)).unwrap();
        let second = serde_json::to_vec(&blocks_response(&[child, genesis])).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn blocks_keep_input_order() {
        let genesis = Block::genesis();
        let child = Block::child_of(&genesis, Address::default(), 1, &[]);
        let body = blocks_response(&[child.clone(), genesis.clone()]);
        assert_eq!(body["blocks"][0]["number"], 1);
        assert_eq!(body["blocks"][1]["number"], 0);
        assert_eq!(body["blocks"][0]["prevhash"], genesis.hash.to_string());
    }

    #[test]
    fn transaction_dict_carries_block_and_confirmations() {
        let tx = make_tx(1);
        let block_hash = H256([0x42; 32]);
        let view = TransactionView {
            hash: tx.hash(),
            transaction: tx.clone(),
            block: Some(block_hash),
            confirmations: 3,
        };
        let body = transactions_response(&[view]);
        let dict = &body["transactions"][0];
        assert_eq!(dict["block"], block_hash.to_string());
        assert_eq!(dict["confirmations"], 3);
        assert_eq!(dict["hash"], tx.hash().to_string());
        assert_eq!(dict["to"], tx.to.to_string());
        assert_eq!(dict["data"], hex::encode(&tx.data.0));
    }

    #[test]
    fn pending_transaction_without_working_block_has_null_block() {
        let tx = make_tx(2);
        let view = TransactionView {
            hash: tx.hash(),
            transaction: tx,
            block: None,
            confirmations: 0,
        };
        let dict = transaction_dict(&view);
        assert_eq!(dict["block"], Value::Null);
        assert_eq!(dict["confirmations"], 0);
    }

    #[test]
    fn peers_keep_ip_and_port_separate() {
        let peers = vec![
            PeerRecord {
                ip: "192.168.1.5".parse().unwrap(),
                port: 30303,
                node_id: vec![0xab, 0xcd],
            },
            PeerRecord {
                ip: "::1".parse().unwrap(),
                port: 1,
                node_id: Vec::new(),
            },
        ];
        let text = serde_json::to_string(&peers_response(&peers)).unwrap();
        assert_eq!(
            text,
            r#"{"peers":[{"ip":"192.168.1.5","node_id":"abcd","port":30303},{"ip":"::1","node_id":"","port":1}]}"#
        );
    }

    #[test]
    fn empty_inputs_produce_empty_lists() {
        assert_eq!(serde_json::to_string(&peers_response(&[])).unwrap(), r#"{"peers":[]}"#);
        assert_eq!(
            serde_json::to_string(&accounts_response(&[])).unwrap(),
            r#"{"accounts":[]}"#
        );
    }
}
