//! Block identifier resolution.
//!
//! One path segment selects between four lookups. [`BlockQuery::parse`] is a
//! pure function over the raw token; [`resolve_blocks`] runs the chosen lookup
//! against the chain collaborator and reports misses with the token exactly
//! as the client sent it.

use tracing::debug;

use crate::chain::ChainManager;
use crate::error::CoreError;
use crate::types::{Block, BlockHash};

/// Number of blocks returned when no identifier is given.
pub const RECENT_BLOCKS_WINDOW: usize = 20;

pub const HEAD_TOKEN: &str = "head";

// ==============================================================================
// Query
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockQuery {
    /// The newest [`RECENT_BLOCKS_WINDOW`] canonical blocks.
    Latest,
    /// The canonical tip.
    Head,
    /// Canonical block at a height.
    ByHeight(u64),
    ByHash(BlockHash),
    /// A token that is neither a height nor a well-formed hash. Resolves to
    /// "no such block", not to a client error.
    Malformed(String),
}

impl BlockQuery {
    pub fn parse(token: Option<&str>) -> Self {
        let token = match token {
            None | Some("") => return Self::Latest,
            Some(token) => token,
        };

        if token == HEAD_TOKEN {
            return Self::Head;
        }

        // All-digit tokens are always heights, even if they would also be
        // valid hex.
        if token.bytes().all(|b| b.is_ascii_digit()) {
            return match token.parse::<u64>() {
                Ok(height) => Self::ByHeight(height),
                Err(_) => Self::Malformed(token.to_owned()),
            };
        }

        match token.parse::<BlockHash>() {
            Ok(hash) => Self::ByHash(hash),
            Err(_) => Self::Malformed(token.to_owned()),
        }
    }
}

// ==============================================================================
// Resolution
// ==============================================================================

/// Resolve the path token into the blocks it names. No token lists the
/// recent window; any other token yields exactly one block or
/// [`CoreError::BlockNotFound`] carrying `token` verbatim.
pub async fn resolve_blocks(
    chain: &dyn ChainManager,
    token: Option<&str>,
) -> Result<Vec<Block>, CoreError> {
    let found = match BlockQuery::parse(token) {
        BlockQuery::Latest => return chain.get_recent_blocks(RECENT_BLOCKS_WINDOW).await,
        BlockQuery::Head => Some(chain.get_head().await?),
        BlockQuery::ByHeight(height) => chain.get_block_by_height(height).await?,
        BlockQuery::ByHash(hash) => chain.get_block_by_hash(&hash).await?,
        BlockQuery::Malformed(token) => {
            debug!(token = %token, "malformed block identifier");
            None
        }
    };

    found
        .map(|block| vec![block])
        .ok_or_else(|| CoreError::BlockNotFound(token.unwrap_or_default().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[test]
    fn parse_distinguishes_every_token_form() {
        assert_eq!(BlockQuery::parse(None), BlockQuery::Latest);
        assert_eq!(BlockQuery::parse(Some("")), BlockQuery::Latest);
        assert_eq!(BlockQuery::parse(Some("head")), BlockQuery::Head);
        assert_eq!(BlockQuery::parse(Some("0")), BlockQuery::ByHeight(0));
        assert_eq!(BlockQuery::parse(Some("0042")), BlockQuery::ByHeight(42));

        let hash = BlockHash::from([0xcd; 32]);
        assert_eq!(
            BlockQuery::parse(Some(&hash.to_string())),
            BlockQuery::ByHash(hash)
        );
    }

    #[test]
    fn all_digit_token_is_a_height_even_at_hash_width() {
        let digits = "1".repeat(64);
        assert_eq!(
            BlockQuery::parse(Some(&digits)),
            BlockQuery::Malformed(digits.clone()),
            "overflowing heights are malformed, never reinterpreted as hashes"
        );
        assert_eq!(
            BlockQuery::parse(Some("18446744073709551615")),
            BlockQuery::ByHeight(u64::MAX)
        );
    }

    #[test]
    fn parse_marks_undecodable_tokens_malformed() {
        let short = "ab".repeat(31);
        let long = "ab".repeat(33);
        for token in ["HEAD", "abc", "zz", "-1", "0x00", short.as_str(), long.as_str()] {
            assert_eq!(
                BlockQuery::parse(Some(token)),
                BlockQuery::Malformed(token.to_owned()),
                "token {token:?}"
            );
        }
    }

    #[tokio::test]
    async fn latest_lists_newest_first_within_window() {
        let (ledger, _rx) = ledger_with_chain(25).await;
        let blocks = resolve_blocks(&ledger, None).await.unwrap();
        assert_eq!(blocks.len(), RECENT_BLOCKS_WINDOW);
        assert_eq!(blocks[0].number, 25);
        assert_eq!(blocks[19].number, 6);
        assert!(blocks.windows(2).all(|w| w[0].prevhash == w[1].hash));
        assert_eq!(resolve_blocks(&ledger, Some("")).await.unwrap(), blocks);
    }

    #[tokio::test]
    async fn latest_on_short_chain_returns_everything() {
        let (ledger, _rx) = ledger_with_chain(3).await;
        let blocks = resolve_blocks(&ledger, None).await.unwrap();
        let numbers: Vec<u64> = blocks.iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![3, 2, 1, 0]);
    }

    #[tokio::test]
    async fn head_matches_first_recent_block() {
        let (ledger, _rx) = ledger_with_chain(5).await;
        let head = resolve_blocks(&ledger, Some(HEAD_TOKEN)).await.unwrap();
        let latest = resolve_blocks(&ledger, None).await.unwrap();
        assert_eq!(head, vec![latest[0].clone()]);
    }

    #[tokio::test]
    async fn height_and_hash_resolve_to_same_block() {
        let (ledger, _rx) = ledger_with_chain(5).await;
        for height in 0..=5u64 {
            let by_height = resolve_blocks(&ledger, Some(&height.to_string()))
                .await
                .unwrap();
            let hash = by_height[0].hash.to_string();
            let by_hash = resolve_blocks(&ledger, Some(&hash)).await.unwrap();
            let by_upper_hash = resolve_blocks(&ledger, Some(&hash.to_uppercase()))
                .await
                .unwrap();
            assert_eq!(by_height, by_hash);
            assert_eq!(by_hash, by_upper_hash);
            assert_eq!(by_height[0].number, height);
        }
    }

    #[tokio::test]
    async fn misses_report_the_token_verbatim() {
        let (ledger, _rx) = ledger_with_chain(2).await;

        let unknown_hash = "AB".repeat(32);
        for token in ["3", "0042", unknown_hash.as_str(), "nothex"] {
            let err = resolve_blocks(&ledger, Some(token)).await.unwrap_err();
            assert!(
                matches!(err, CoreError::BlockNotFound(ref t) if t == token),
                "token {token:?}"
            );
            assert_eq!(err.to_string(), format!("No block {token}"));
        }
    }

    #[tokio::test]
    async fn height_lookup_ignores_side_branches() {
        let (ledger, _rx) = ledger_with_chain(3).await;
        let genesis = ledger.get_block_by_height(0).await.unwrap().unwrap();
        let side = Block::child_of(&genesis, address_from_byte(0xff), 99, &[]);
        ledger.commit_block(side.clone(), Vec::new()).await.unwrap();

        let at_one = resolve_blocks(&ledger, Some("1")).await.unwrap();
        assert_ne!(at_one[0].hash, side.hash);

        // Still reachable by hash.
        let by_hash = resolve_blocks(&ledger, Some(&side.hash.to_string()))
            .await
            .unwrap();
        assert_eq!(by_hash[0], side);
    }
}
