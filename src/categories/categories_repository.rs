use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use uuid::Uuid;

use super::categories_model::{
    Category, NewCategory, UpdateCategory, CATEGORY_KIND_EXPENSE, CATEGORY_KIND_INCOME,
};
use super::categories_traits::CategoryRepositoryTrait;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{Result, ValidationError};
use crate::schema::{categories, transactions};

pub struct CategoryRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        CategoryRepository { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn get_all_categories(&self) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(categories::table
            .order((categories::kind.asc(), categories::name.asc()))
            .load::<Category>(&mut conn)?)
    }

    fn get_category_by_id(&self, id: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(categories::table
            .find(id)
            .first::<Category>(&mut conn)
            .optional()?)
    }

    fn get_income_categories(&self) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(categories::table
            .filter(categories::kind.eq(CATEGORY_KIND_INCOME))
            .order(categories::name.asc())
            .load::<Category>(&mut conn)?)
    }

    fn get_expense_categories(&self) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(categories::table
            .filter(categories::kind.eq(CATEGORY_KIND_EXPENSE))
            .order(categories::name.asc())
            .load::<Category>(&mut conn)?)
    }

    fn has_transactions(&self, category_name: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let count: i64 = transactions::table
            .filter(transactions::category.eq(category_name))
            .count()
            .get_result(&mut conn)?;
        Ok(count > 0)
    }

    async fn create_category(&self, new_category: NewCategory) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let mut category = new_category;
                if category.id.is_none() {
                    category.id = Some(Uuid::new_v4().to_string());
                }
                if category.created_at.is_none() {
                    category.created_at = Some(Utc::now().to_rfc3339());
                }

                diesel::insert_into(categories::table)
                    .values(&category)
                    .execute(conn)?;

                Ok(categories::table
                    .find(category.id.expect("id was set above"))
                    .first::<Category>(conn)?)
            })
            .await
    }

    async fn update_category(&self, id: &str, update: UpdateCategory) -> Result<Category> {
        let id_owned = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                diesel::update(categories::table.find(&id_owned))
                    .set(&update)
                    .execute(conn)?;

                Ok(categories::table
                    .find(&id_owned)
                    .first::<Category>(conn)?)
            })
            .await
    }

    async fn delete_category(&self, id: &str) -> Result<usize> {
        let id_owned = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let category = categories::table
                    .find(&id_owned)
                    .first::<Category>(conn)
                    .optional()?;

                let Some(category) = category else {
                    return Ok(0);
                };

                // Check if any transactions still reference this category
                let transaction_count: i64 = transactions::table
                    .filter(transactions::category.eq(&category.name))
                    .count()
                    .get_result(conn)?;

                if transaction_count > 0 {
                    return Err(crate::errors::Error::Validation(
                        ValidationError::InvalidInput(format!(
                            "Cannot delete category: {} transactions are assigned to it",
                            transaction_count
                        )),
                    ));
                }

                Ok(diesel::delete(categories::table.find(&id_owned)).execute(conn)?)
            })
            .await
    }
}
