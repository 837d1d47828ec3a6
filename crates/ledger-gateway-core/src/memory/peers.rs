use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::chain::PeerManager;
use crate::error::CoreError;
use crate::types::PeerRecord;

#[derive(Default)]
struct Directory {
    known: Vec<PeerRecord>,
    connected: Vec<PeerRecord>,
}

/// Known and connected peer addresses, in insertion order.
///
/// A connected peer is always also known.
#[derive(Default)]
pub struct PeerDirectory {
    inner: RwLock<Directory>,
}

impl PeerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_known(&self, peer: PeerRecord) {
        let mut dir = self.inner.write().await;
        if !dir.known.contains(&peer) {
            dir.known.push(peer);
        }
    }

    pub async fn mark_connected(&self, peer: PeerRecord) {
        let mut dir = self.inner.write().await;
        if !dir.known.contains(&peer) {
            dir.known.push(peer.clone());
        }
        if !dir.connected.contains(&peer) {
            dir.connected.push(peer);
        }
    }
}

#[async_trait]
impl PeerManager for PeerDirectory {
    async fn connected_peers(&self) -> Result<Vec<PeerRecord>, CoreError> {
        Ok(self.inner.read().await.connected.clone())
    }

    async fn known_peers(&self) -> Result<Vec<PeerRecord>, CoreError> {
        Ok(self.inner.read().await.known.clone())
    }
}
