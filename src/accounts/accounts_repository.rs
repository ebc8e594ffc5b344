use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use uuid::Uuid;

use super::accounts_model::{Account, NewAccount};
use super::accounts_traits::AccountRepositoryTrait;
use crate::db::{get_connection, WriteHandle};
use crate::errors::Result;
use crate::schema::accounts;

pub struct AccountRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        AccountRepository { pool, writer }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    fn get_accounts(&self) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(accounts::table
            .order(accounts::name.asc())
            .load::<Account>(&mut conn)?)
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Account> {
                let mut account = new_account;
                if account.id.is_none() {
                    account.id = Some(Uuid::new_v4().to_string());
                }
                if account.created_at.is_none() {
                    account.created_at = Some(Utc::now().to_rfc3339());
                }

                diesel::insert_into(accounts::table)
                    .values(&account)
                    .execute(conn)?;

                Ok(accounts::table
                    .find(account.id.expect("id was set above"))
                    .first::<Account>(conn)?)
            })
            .await
    }

    async fn delete_account(&self, account_id: &str) -> Result<usize> {
        let id_owned = account_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(accounts::table.find(&id_owned)).execute(conn)?)
            })
            .await
    }
}
