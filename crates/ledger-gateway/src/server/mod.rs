mod accounts;
mod blocks;
mod cors;
mod error;
mod peers;
mod transactions;

use std::future::Future;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use axum::middleware;
use axum::routing::{get, put};
use axum::Router;
use eyre::WrapErr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use ledger_gateway_core::{ChainManager, PeerManager};

// ==============================================================================
// Configuration
// ==============================================================================

pub const DEFAULT_BASE_PATH: &str = "/api/v0alpha";

/// Process-wide settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_host: String,
    pub port: u16,
    pub base_path: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        if self.listen_host.contains(':') && !self.listen_host.starts_with('[') {
            format!("[{}]:{}", self.listen_host, self.port)
        } else {
            format!("{}:{}", self.listen_host, self.port)
        }
    }
}

/// Leading slash, no trailing slash; empty means the API is mounted at `/`.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    pub chain: Arc<dyn ChainManager>,
    pub peers: Arc<dyn PeerManager>,
    base_path: String,
}

impl AppState {
    /// Absolute path of a resource below the API base path.
    fn resource_path(&self, relative: &str) -> String {
        format!("{}{relative}", self.base_path)
    }
}

type SharedState = Arc<AppState>;

// ==============================================================================
// Router
// ==============================================================================

/// Raw transactions are small; anything larger is refused before decoding.
const SUBMIT_BODY_LIMIT: usize = 256 * 1024;

fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/blocks/", get(blocks::list_blocks))
        .route("/blocks/{token}", get(blocks::get_block))
        .route(
            "/transactions/",
            put(transactions::submit_transaction)
                .post(transactions::submit_transaction)
                .layer(DefaultBodyLimit::max(SUBMIT_BODY_LIMIT)),
        )
        .route("/transactions/{hash}", get(transactions::get_transaction))
        .route("/accounts/", get(accounts::list_accounts))
        .route("/accounts/{address}", get(accounts::get_account))
        .route("/peers/connected", get(peers::connected_peers))
        .route("/peers/known", get(peers::known_peers));

    let router = if state.base_path.is_empty() {
        api
    } else {
        Router::new().nest(&state.base_path, api)
    };

    router
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cors::cors_shim))
        .with_state(Arc::new(state))
}

async fn route_not_found(uri: Uri) -> error::AppError {
    error::AppError::NotFound(format!("No route {}", uri.path()))
}

// ==============================================================================
// Server
// ==============================================================================

/// The HTTP gateway, built once at startup with its collaborators injected.
pub struct ApiServer {
    config: ServerConfig,
    router: Router,
}

impl ApiServer {
    pub fn new(
        config: ServerConfig,
        chain: Arc<dyn ChainManager>,
        peers: Arc<dyn PeerManager>,
    ) -> Self {
        let state = AppState {
            chain,
            peers,
            base_path: normalize_base_path(&config.base_path),
        };
        Self {
            router: build_router(state),
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    #[cfg(test)]
    fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> eyre::Result<()> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("bind TCP listener on {bind_addr}"))?;
        self.serve(listener, shutdown).await
    }

    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> eyre::Result<()> {
        let local_addr = listener.local_addr().context("read listener address")?;
        tracing::info!(
            addr = %local_addr,
            base_path = %normalize_base_path(&self.config.base_path),
            "listening"
        );
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("run HTTP server")
    }
}
