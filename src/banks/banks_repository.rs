use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use uuid::Uuid;

use super::banks_model::{Bank, NewBank};
use super::banks_traits::BankRepositoryTrait;
use crate::db::{get_connection, WriteHandle};
use crate::errors::Result;
use crate::schema::banks;

pub struct BankRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BankRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        BankRepository { pool, writer }
    }
}

#[async_trait]
impl BankRepositoryTrait for BankRepository {
    fn get_banks(&self) -> Result<Vec<Bank>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(banks::table
            .order(banks::name.asc())
            .load::<Bank>(&mut conn)?)
    }

    fn get_bank_by_name(&self, name: &str) -> Result<Option<Bank>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(banks::table
            .filter(banks::name.eq(name))
            .first::<Bank>(&mut conn)
            .optional()?)
    }

    async fn create_bank(&self, new_bank: NewBank) -> Result<Bank> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Bank> {
                let mut bank = new_bank;
                if bank.id.is_none() {
                    bank.id = Some(Uuid::new_v4().to_string());
                }
                if bank.created_at.is_none() {
                    bank.created_at = Some(Utc::now().to_rfc3339());
                }

                diesel::insert_into(banks::table)
                    .values(&bank)
                    .execute(conn)?;

                Ok(banks::table
                    .find(bank.id.expect("id was set above"))
                    .first::<Bank>(conn)?)
            })
            .await
    }

    async fn delete_bank(&self, bank_id: &str) -> Result<usize> {
        let id_owned = bank_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(banks::table.find(&id_owned)).execute(conn)?)
            })
            .await
    }
}
