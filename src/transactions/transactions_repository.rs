use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use uuid::Uuid;

use super::transactions_errors::TransactionError;
use super::transactions_model::{
    NewTransaction, Transaction, TransactionChangeset, TransactionFilters,
};
use super::transactions_traits::TransactionRepositoryTrait;
use crate::constants::TRANSFER_CATEGORY;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{Error, Result};
use crate::schema::transactions;

pub struct TransactionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        TransactionRepository { pool, writer }
    }
}

fn insert_transaction_row(
    conn: &mut SqliteConnection,
    mut row: NewTransaction,
) -> Result<Transaction> {
    if row.id.is_none() {
        row.id = Some(Uuid::new_v4().to_string());
    }
    let now = Utc::now().to_rfc3339();
    if row.created_at.is_none() {
        row.created_at = Some(now.clone());
    }
    if row.updated_at.is_none() {
        row.updated_at = Some(now);
    }

    diesel::insert_into(transactions::table)
        .values(&row)
        .execute(conn)?;

    Ok(transactions::table
        .find(row.id.expect("id was set above"))
        .first::<Transaction>(conn)?)
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn list(&self, filters: &TransactionFilters) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = transactions::table.into_boxed();

        // the global list hides paired transfer rows to avoid double-counting
        if filters.bank.is_none() && filters.category.is_none() && !filters.include_transfers {
            query = query.filter(transactions::category.ne(TRANSFER_CATEGORY));
        }
        if let Some(start_date) = &filters.start_date {
            query = query.filter(transactions::date.ge(start_date.clone()));
        }
        if let Some(end_date) = &filters.end_date {
            query = query.filter(transactions::date.le(end_date.clone()));
        }
        if let Some(category) = &filters.category {
            query = query.filter(transactions::category.eq(category.clone()));
        }
        if let Some(bank) = &filters.bank {
            query = query.filter(transactions::bank.eq(bank.clone()));
        }
        if let Some(account) = &filters.account {
            query = query.filter(transactions::account.eq(account.clone()));
        }
        if let Some(description) = &filters.description {
            query = query.filter(transactions::description.eq(description.clone()));
        }

        query = query.order((transactions::date.desc(), transactions::id.desc()));

        if let Some(limit) = filters.limit {
            if limit > 0 {
                query = query.limit(limit);
            }
        }

        Ok(query.load::<Transaction>(&mut conn)?)
    }

    fn get_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(transactions::table
            .find(transaction_id)
            .first::<Transaction>(&mut conn)
            .optional()?)
    }

    fn load_bank_rows(&self) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(transactions::table
            .filter(transactions::bank.is_not_null())
            .load::<Transaction>(&mut conn)?)
    }

    async fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                insert_transaction_row(conn, new_transaction)
            })
            .await
    }

    async fn insert_pair(
        &self,
        first: NewTransaction,
        second: NewTransaction,
    ) -> Result<(Transaction, Transaction)> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<(Transaction, Transaction)> {
                    let first_row = insert_transaction_row(conn, first)?;
                    let second_row = insert_transaction_row(conn, second)?;
                    Ok((first_row, second_row))
                },
            )
            .await
    }

    async fn update(
        &self,
        transaction_id: &str,
        changes: TransactionChangeset,
    ) -> Result<Transaction> {
        let id_owned = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let affected = diesel::update(transactions::table.find(&id_owned))
                    .set(&changes)
                    .execute(conn)?;
                if affected == 0 {
                    return Err(Error::Transaction(TransactionError::NotFound(
                        id_owned.clone(),
                    )));
                }

                Ok(transactions::table
                    .find(&id_owned)
                    .first::<Transaction>(conn)?)
            })
            .await
    }

    async fn delete(&self, transaction_id: &str) -> Result<usize> {
        let id_owned = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(transactions::table.find(&id_owned)).execute(conn)?)
            })
            .await
    }
}
