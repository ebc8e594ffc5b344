use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Parses a stored kind; anything unrecognized reads as an expense.
    pub fn parse(value: &str) -> Self {
        match value {
            "INCOME" => Self::Income,
            _ => Self::Expense,
        }
    }
}

/// One income or expense record. `income` and `expense` are derived columns:
/// exactly one of them carries the absolute amount, depending on `kind`.
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub category: String,
    pub description: String,
    pub bank: Option<String>,
    pub account: String,
    pub amount: String,
    pub income: String,
    pub expense: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        TransactionKind::parse(&self.kind)
    }

    pub fn amount_decimal(&self) -> Decimal {
        self.amount.parse().unwrap_or(Decimal::ZERO)
    }

    pub fn income_decimal(&self) -> Decimal {
        self.income.parse().unwrap_or(Decimal::ZERO)
    }

    pub fn expense_decimal(&self) -> Decimal {
        self.expense.parse().unwrap_or(Decimal::ZERO)
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub date: String,
    pub kind: String,
    pub category: String,
    pub description: String,
    pub bank: Option<String>,
    pub account: String,
    pub amount: String,
    pub income: String,
    pub expense: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Column-level changeset the repository applies.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::transactions)]
pub struct TransactionChangeset {
    pub date: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub bank: Option<Option<String>>,
    pub account: Option<String>,
    pub amount: Option<String>,
    pub income: Option<String>,
    pub expense: Option<String>,
    pub updated_at: Option<String>,
}

/// Validated input for recording a transaction.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub date: String,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub bank: Option<String>,
    pub account: Option<String>,
    pub amount: Decimal,
}

/// Partial update; `Some(None)` clears the bank.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub date: Option<String>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub bank: Option<Option<String>>,
    pub account: Option<String>,
    pub amount: Option<Decimal>,
}

/// Input for an internal transfer between two banks.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransferInput {
    pub date: String,
    pub from_bank: String,
    pub to_bank: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Listing filters; the global list hides internal transfers unless a bank or
/// category filter is active or `include_transfers` is set.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<String>,
    pub bank: Option<String>,
    pub account: Option<String>,
    pub description: Option<String>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub include_transfers: bool,
}

/// Per-(bank, account) balance aggregate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankBalance {
    pub bank: String,
    pub account: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

/// A bank together with its overall balance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankWithBalance {
    pub id: String,
    pub name: String,
    pub balance: Decimal,
}
