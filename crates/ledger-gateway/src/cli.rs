use clap::Parser;

use ledger_gateway_core::{Address, PeerRecord};

use crate::server::{ServerConfig, DEFAULT_BASE_PATH};

/// JSON REST gateway over a node's blocks, transactions, accounts and peers.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Address to bind the API server to.
    #[arg(long, default_value = "127.0.0.1", env = "LEDGER_GATEWAY_LISTEN_HOST")]
    pub listen_host: String,

    /// Port to listen on.
    #[arg(long, default_value = "30203", env = "LEDGER_GATEWAY_PORT")]
    pub port: u16,

    /// Path prefix every API route is mounted under.
    #[arg(long, default_value = DEFAULT_BASE_PATH, env = "LEDGER_GATEWAY_BASE_PATH")]
    pub base_path: String,

    /// Known peer as `<node_id_hex>@<ip>:<port>` (repeatable).
    #[arg(long = "peer")]
    pub peers: Vec<PeerRecord>,

    /// Report the `--peer` entries as connected, not only known.
    #[arg(long)]
    pub connect: bool,

    /// Seal the pending pool into a new block every N seconds (0 disables).
    #[arg(long, default_value = "0")]
    pub seal_interval_secs: u64,

    /// Coinbase address for sealed blocks (40 hex digits).
    #[arg(long, default_value = "0000000000000000000000000000000000000000")]
    pub coinbase: Address,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            listen_host: self.listen_host.clone(),
            port: self.port,
            base_path: self.base_path.clone(),
        }
    }
}
