#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No block {0}")]
    BlockNotFound(String),

    #[error("No transaction {0}")]
    TxNotFound(String),

    #[error("invalid transaction hash: {0}")]
    InvalidTxHash(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction data: {0}")]
    InvalidTxData(String),

    #[error("chain collaborator unavailable: {0}")]
    Unavailable(String),
}
