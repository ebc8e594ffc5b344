use std::sync::Arc;

use async_trait::async_trait;

use super::accounts_model::{Account, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::{Result, ValidationError};

pub struct AccountService<T: AccountRepositoryTrait> {
    account_repo: Arc<T>,
}

impl<T: AccountRepositoryTrait> AccountService<T> {
    pub fn new(account_repo: Arc<T>) -> Self {
        AccountService { account_repo }
    }
}

#[async_trait]
impl<T: AccountRepositoryTrait + Send + Sync> AccountServiceTrait for AccountService<T> {
    fn get_accounts(&self) -> Result<Vec<Account>> {
        self.account_repo.get_accounts()
    }

    async fn create_account(&self, name: String) -> Result<Account> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }

        self.account_repo
            .create_account(NewAccount {
                id: None,
                name,
                created_at: None,
            })
            .await
    }

    async fn delete_account(&self, account_id: &str) -> Result<usize> {
        self.account_repo.delete_account(account_id).await
    }
}
