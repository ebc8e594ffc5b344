use async_trait::async_trait;

use super::accounts_model::{Account, NewAccount};
use crate::errors::Result;

/// Trait for account repository operations
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    fn get_accounts(&self) -> Result<Vec<Account>>;
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;
    async fn delete_account(&self, account_id: &str) -> Result<usize>;
}

/// Trait for account service operations
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    fn get_accounts(&self) -> Result<Vec<Account>>;
    async fn create_account(&self, name: String) -> Result<Account>;
    async fn delete_account(&self, account_id: &str) -> Result<usize>;
}
