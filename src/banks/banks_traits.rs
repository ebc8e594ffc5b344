use async_trait::async_trait;

use super::banks_model::{Bank, NewBank};
use crate::errors::Result;

/// Trait for bank repository operations
#[async_trait]
pub trait BankRepositoryTrait: Send + Sync {
    fn get_banks(&self) -> Result<Vec<Bank>>;
    fn get_bank_by_name(&self, name: &str) -> Result<Option<Bank>>;
    async fn create_bank(&self, new_bank: NewBank) -> Result<Bank>;
    async fn delete_bank(&self, bank_id: &str) -> Result<usize>;
}

/// Trait for bank service operations
#[async_trait]
pub trait BankServiceTrait: Send + Sync {
    fn get_banks(&self) -> Result<Vec<Bank>>;
    async fn create_bank(&self, name: String) -> Result<Bank>;
    async fn delete_bank(&self, bank_id: &str) -> Result<usize>;
}
