use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::debug;
use num_traits::Zero;
use rust_decimal::Decimal;

use super::transactions_errors::TransactionError;
use super::transactions_model::{
    BankBalance, BankWithBalance, NewTransaction, Transaction, TransactionChangeset,
    TransactionFilters, TransactionInput, TransactionKind, TransactionUpdate, TransferInput,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::banks::BankRepositoryTrait;
use crate::constants::{
    DATE_FORMAT, DEFAULT_ACCOUNT, DISPLAY_DECIMAL_PRECISION, TRANSFER_CATEGORY,
};
use crate::errors::{Result, ValidationError};

pub struct TransactionService {
    transaction_repo: Arc<dyn TransactionRepositoryTrait>,
    bank_repo: Arc<dyn BankRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        transaction_repo: Arc<dyn TransactionRepositoryTrait>,
        bank_repo: Arc<dyn BankRepositoryTrait>,
    ) -> Self {
        TransactionService {
            transaction_repo,
            bank_repo,
        }
    }

    fn validate_date(date: &str) -> Result<()> {
        NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidInput(format!("Invalid date '{}'", date)))?;
        Ok(())
    }

    /// Derived (income, expense) columns for a kind and absolute amount.
    fn split_amount(kind: TransactionKind, amount: Decimal) -> (String, String) {
        match kind {
            TransactionKind::Income => (amount.to_string(), Decimal::ZERO.to_string()),
            TransactionKind::Expense => (Decimal::ZERO.to_string(), amount.to_string()),
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transactions(&self, filters: &TransactionFilters) -> Result<Vec<Transaction>> {
        self.transaction_repo.list(filters)
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.transaction_repo
            .get_by_id(transaction_id)?
            .ok_or_else(|| TransactionError::NotFound(transaction_id.to_string()).into())
    }

    async fn create_transaction(&self, input: TransactionInput) -> Result<Transaction> {
        Self::validate_date(&input.date)?;
        if input.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category".to_string()).into());
        }

        let amount = input.amount.abs();
        let (income, expense) = Self::split_amount(input.kind, amount);

        let new_transaction = NewTransaction {
            id: None,
            date: input.date,
            kind: input.kind.as_str().to_string(),
            category: input.category,
            description: input.description,
            bank: input.bank.filter(|b| !b.is_empty()),
            account: input
                .account
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string()),
            amount: amount.to_string(),
            income,
            expense,
            created_at: None,
            updated_at: None,
        };

        self.transaction_repo.insert(new_transaction).await
    }

    async fn update_transaction(
        &self,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        let existing = self.get_transaction(transaction_id)?;

        if let Some(date) = &update.date {
            Self::validate_date(date)?;
        }

        let mut changes = TransactionChangeset {
            date: update.date,
            kind: update.kind.map(|k| k.as_str().to_string()),
            category: update.category,
            description: update.description,
            bank: update.bank,
            account: update.account,
            updated_at: Some(Utc::now().to_rfc3339()),
            ..Default::default()
        };

        // a new amount (or kind) re-derives the income/expense columns from
        // the effective kind
        if let Some(amount) = update.amount {
            let amount = amount.abs();
            let effective_kind = update.kind.unwrap_or_else(|| existing.kind());
            let (income, expense) = Self::split_amount(effective_kind, amount);
            changes.amount = Some(amount.to_string());
            changes.income = Some(income);
            changes.expense = Some(expense);
        } else if let Some(kind) = update.kind {
            let (income, expense) = Self::split_amount(kind, existing.amount_decimal());
            changes.income = Some(income);
            changes.expense = Some(expense);
        }

        self.transaction_repo.update(transaction_id, changes).await
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<()> {
        let deleted = self.transaction_repo.delete(transaction_id).await?;
        if deleted == 0 {
            return Err(TransactionError::NotFound(transaction_id.to_string()).into());
        }
        Ok(())
    }

    async fn create_transfer(&self, input: TransferInput) -> Result<(Transaction, Transaction)> {
        Self::validate_date(&input.date)?;
        if input.from_bank == input.to_bank {
            return Err(TransactionError::SameBankTransfer.into());
        }
        if input.amount <= Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Transfer amount must be greater than zero".to_string(),
            )
            .into());
        }

        let amount = input.amount;
        let from_bank = input.from_bank;
        let to_bank = input.to_bank;
        let description = input
            .description
            .unwrap_or_else(|| "Internal transfer".to_string());

        debug!("Transferring {} from '{}' to '{}'", amount, from_bank, to_bank);

        let (out_income, out_expense) = Self::split_amount(TransactionKind::Expense, amount);
        let outgoing = NewTransaction {
            id: None,
            date: input.date.clone(),
            kind: TransactionKind::Expense.as_str().to_string(),
            category: TRANSFER_CATEGORY.to_string(),
            description: format!("{} → {}", description, to_bank),
            bank: Some(from_bank.clone()),
            account: DEFAULT_ACCOUNT.to_string(),
            amount: amount.to_string(),
            income: out_income,
            expense: out_expense,
            created_at: None,
            updated_at: None,
        };

        let (in_income, in_expense) = Self::split_amount(TransactionKind::Income, amount);
        let incoming = NewTransaction {
            id: None,
            date: input.date,
            kind: TransactionKind::Income.as_str().to_string(),
            category: TRANSFER_CATEGORY.to_string(),
            description: format!("{} ← {}", description, from_bank),
            bank: Some(to_bank),
            account: DEFAULT_ACCOUNT.to_string(),
            amount: amount.to_string(),
            income: in_income,
            expense: in_expense,
            created_at: None,
            updated_at: None,
        };

        self.transaction_repo.insert_pair(outgoing, incoming).await
    }

    fn get_bank_balances(&self) -> Result<Vec<BankBalance>> {
        let rows = self.transaction_repo.load_bank_rows()?;

        let mut totals: HashMap<(String, String), (Decimal, Decimal)> = HashMap::new();
        for row in &rows {
            let Some(bank) = &row.bank else { continue };
            if bank.is_empty() {
                continue;
            }
            let entry = totals
                .entry((bank.clone(), row.account.clone()))
                .or_insert((Decimal::zero(), Decimal::zero()));
            entry.0 += row.income_decimal();
            entry.1 += row.expense_decimal();
        }

        let mut balances: Vec<BankBalance> = totals
            .into_iter()
            .map(|((bank, account), (total_income, total_expense))| BankBalance {
                bank,
                account,
                total_income: total_income.round_dp(DISPLAY_DECIMAL_PRECISION),
                total_expense: total_expense.round_dp(DISPLAY_DECIMAL_PRECISION),
                balance: (total_income - total_expense).round_dp(DISPLAY_DECIMAL_PRECISION),
            })
            .collect();
        balances.sort_by(|a, b| b.balance.cmp(&a.balance));
        Ok(balances)
    }

    fn get_banks_with_balance(&self) -> Result<Vec<BankWithBalance>> {
        let balances = self.get_bank_balances()?;

        let mut per_bank: HashMap<String, Decimal> = HashMap::new();
        for balance in &balances {
            *per_bank
                .entry(balance.bank.clone())
                .or_insert(Decimal::zero()) += balance.balance;
        }

        let mut result: Vec<BankWithBalance> = self
            .bank_repo
            .get_banks()?
            .into_iter()
            .filter_map(|bank| {
                let balance = per_bank.get(&bank.name).copied().unwrap_or(Decimal::ZERO);
                (balance > Decimal::ZERO).then_some(BankWithBalance {
                    id: bank.id,
                    name: bank.name,
                    balance,
                })
            })
            .collect();
        result.sort_by(|a, b| b.balance.cmp(&a.balance));
        Ok(result)
    }
}
