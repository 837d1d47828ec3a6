mod cli;
mod server;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use ledger_gateway_core::memory::{MemoryLedger, PeerDirectory};
use ledger_gateway_core::Block;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    // Standalone devnet collaborators: an in-memory chain rooted at genesis
    // and a static peer directory seeded from the command line.
    let (ledger, submissions) = MemoryLedger::new(Block::genesis());
    let ledger = Arc::new(ledger);
    ledger.set_coinbase(args.coinbase).await;

    tokio::spawn({
        let ledger = ledger.clone();
        async move { ledger.admit_submissions(submissions).await }
    });

    if args.seal_interval_secs > 0 {
        tokio::spawn(seal_periodically(
            ledger.clone(),
            Duration::from_secs(args.seal_interval_secs),
        ));
        tracing::info!(interval_secs = args.seal_interval_secs, "block sealing enabled");
    }

    let peers = Arc::new(PeerDirectory::new());
    for peer in &args.peers {
        if args.connect {
            peers.mark_connected(peer.clone()).await;
        } else {
            peers.add_known(peer.clone()).await;
        }
    }
    tracing::info!(peers = args.peers.len(), connected = args.connect, "peer directory ready");

    let server = server::ApiServer::new(args.server_config(), ledger, peers);
    if server.config().listen_host == "0.0.0.0" {
        tracing::warn!("server is bound to 0.0.0.0 and is accessible from the network");
    }

    server.run(shutdown_signal()).await
}

async fn seal_periodically(ledger: Arc<MemoryLedger>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if let Some(block) = ledger.seal_pending().await {
            tracing::info!(
                number = block.number,
                hash = %block.hash,
                transactions = block.transactions.len(),
                "sealed pending transactions"
            );
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "could not install Ctrl-C handler; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
