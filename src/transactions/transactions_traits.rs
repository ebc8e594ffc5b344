use async_trait::async_trait;

use super::transactions_model::{
    BankBalance, BankWithBalance, NewTransaction, Transaction, TransactionChangeset,
    TransactionFilters, TransactionInput, TransactionUpdate, TransferInput,
};
use crate::errors::Result;

/// Trait for transaction repository operations
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn list(&self, filters: &TransactionFilters) -> Result<Vec<Transaction>>;
    fn get_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>>;
    /// Every row that names a bank, for balance aggregation.
    fn load_bank_rows(&self) -> Result<Vec<Transaction>>;
    async fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    /// Inserts both legs of an internal transfer in one transaction.
    async fn insert_pair(
        &self,
        first: NewTransaction,
        second: NewTransaction,
    ) -> Result<(Transaction, Transaction)>;
    async fn update(
        &self,
        transaction_id: &str,
        changes: TransactionChangeset,
    ) -> Result<Transaction>;
    async fn delete(&self, transaction_id: &str) -> Result<usize>;
}

/// Trait for transaction service operations
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transactions(&self, filters: &TransactionFilters) -> Result<Vec<Transaction>>;
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    async fn create_transaction(&self, input: TransactionInput) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: &str) -> Result<()>;
    /// Records an internal transfer as two linked rows: an expense on the
    /// source bank and an income on the destination bank.
    async fn create_transfer(&self, input: TransferInput) -> Result<(Transaction, Transaction)>;

    fn get_bank_balances(&self) -> Result<Vec<BankBalance>>;
    fn get_banks_with_balance(&self) -> Result<Vec<BankWithBalance>>;
}
