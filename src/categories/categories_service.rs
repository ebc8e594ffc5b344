use std::sync::Arc;

use async_trait::async_trait;

use super::categories_model::{
    Category, NewCategory, UpdateCategory, CATEGORY_KIND_EXPENSE, CATEGORY_KIND_INCOME,
};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::{Result, ValidationError};

pub struct CategoryService<T: CategoryRepositoryTrait> {
    category_repo: Arc<T>,
}

impl<T: CategoryRepositoryTrait> CategoryService<T> {
    pub fn new(category_repo: Arc<T>) -> Self {
        CategoryService { category_repo }
    }

    fn kind_label(is_income: bool) -> String {
        if is_income {
            CATEGORY_KIND_INCOME.to_string()
        } else {
            CATEGORY_KIND_EXPENSE.to_string()
        }
    }
}

#[async_trait]
impl<T: CategoryRepositoryTrait + Send + Sync> CategoryServiceTrait for CategoryService<T> {
    fn get_all_categories(&self) -> Result<Vec<Category>> {
        self.category_repo.get_all_categories()
    }

    fn get_category(&self, id: &str) -> Result<Option<Category>> {
        self.category_repo.get_category_by_id(id)
    }

    fn get_income_categories(&self) -> Result<Vec<Category>> {
        self.category_repo.get_income_categories()
    }

    fn get_expense_categories(&self) -> Result<Vec<Category>> {
        self.category_repo.get_expense_categories()
    }

    async fn create_category(&self, name: String, is_income: bool) -> Result<Category> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }

        let new_category = NewCategory {
            id: None,
            name,
            kind: Self::kind_label(is_income),
            created_at: None,
        };

        self.category_repo.create_category(new_category).await
    }

    async fn update_category(
        &self,
        id: &str,
        name: Option<String>,
        is_income: Option<bool>,
    ) -> Result<Category> {
        if let Some(n) = &name {
            if n.trim().is_empty() {
                return Err(ValidationError::MissingField("name".to_string()).into());
            }
        }

        let update = UpdateCategory {
            name: name.map(|n| n.trim().to_string()),
            kind: is_income.map(Self::kind_label),
        };

        if update.name.is_none() && update.kind.is_none() {
            return self.category_repo.get_category_by_id(id)?.ok_or_else(|| {
                ValidationError::InvalidInput(format!("Category '{}' not found", id)).into()
            });
        }

        self.category_repo.update_category(id, update).await
    }

    async fn delete_category(&self, id: &str) -> Result<usize> {
        self.category_repo.delete_category(id).await
    }
}
