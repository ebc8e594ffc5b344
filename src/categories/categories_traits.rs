use async_trait::async_trait;

use super::categories_model::{Category, NewCategory, UpdateCategory};
use crate::errors::Result;

/// Trait for category repository operations
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn get_all_categories(&self) -> Result<Vec<Category>>;
    fn get_category_by_id(&self, id: &str) -> Result<Option<Category>>;
    fn get_income_categories(&self) -> Result<Vec<Category>>;
    fn get_expense_categories(&self) -> Result<Vec<Category>>;
    fn has_transactions(&self, category_name: &str) -> Result<bool>;
    async fn create_category(&self, new_category: NewCategory) -> Result<Category>;
    async fn update_category(&self, id: &str, update: UpdateCategory) -> Result<Category>;
    async fn delete_category(&self, id: &str) -> Result<usize>;
}

/// Trait for category service operations
#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    fn get_all_categories(&self) -> Result<Vec<Category>>;
    fn get_category(&self, id: &str) -> Result<Option<Category>>;
    fn get_income_categories(&self) -> Result<Vec<Category>>;
    fn get_expense_categories(&self) -> Result<Vec<Category>>;
    async fn create_category(&self, name: String, is_income: bool) -> Result<Category>;
    async fn update_category(
        &self,
        id: &str,
        name: Option<String>,
        is_income: Option<bool>,
    ) -> Result<Category>;
    async fn delete_category(&self, id: &str) -> Result<usize>;
}
