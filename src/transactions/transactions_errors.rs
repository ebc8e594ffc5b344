use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Transaction '{0}' not found")]
    NotFound(String),

    #[error("Invalid transaction data: {0}")]
    InvalidData(String),

    #[error("Source and destination banks must differ")]
    SameBankTransfer,
}
