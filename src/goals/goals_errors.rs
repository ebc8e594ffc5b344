use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoalError {
    #[error("Savings goal '{0}' not found")]
    NotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Withdrawal '{0}' was already repaid")]
    AlreadyRepaid(String),

    #[error("Contribution '{0}' not found")]
    ContributionNotFound(String),

    #[error("Withdrawal '{0}' not found")]
    WithdrawalNotFound(String),
}
