use std::sync::Arc;

use async_trait::async_trait;

use super::banks_model::{Bank, NewBank};
use super::banks_traits::{BankRepositoryTrait, BankServiceTrait};
use crate::errors::{Result, ValidationError};

pub struct BankService<T: BankRepositoryTrait> {
    bank_repo: Arc<T>,
}

impl<T: BankRepositoryTrait> BankService<T> {
    pub fn new(bank_repo: Arc<T>) -> Self {
        BankService { bank_repo }
    }
}

#[async_trait]
impl<T: BankRepositoryTrait + Send + Sync> BankServiceTrait for BankService<T> {
    fn get_banks(&self) -> Result<Vec<Bank>> {
        self.bank_repo.get_banks()
    }

    async fn create_bank(&self, name: String) -> Result<Bank> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if self.bank_repo.get_bank_by_name(&name)?.is_some() {
            return Err(
                ValidationError::InvalidInput(format!("Bank '{}' already exists", name)).into(),
            );
        }

        self.bank_repo
            .create_bank(NewBank {
                id: None,
                name,
                created_at: None,
            })
            .await
    }

    async fn delete_bank(&self, bank_id: &str) -> Result<usize> {
        self.bank_repo.delete_bank(bank_id).await
    }
}
