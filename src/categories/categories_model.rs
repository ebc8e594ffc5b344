use diesel::prelude::*;
use serde::{Deserialize, Serialize};

pub const CATEGORY_KIND_INCOME: &str = "INCOME";
pub const CATEGORY_KIND_EXPENSE: &str = "EXPENSE";

/// Database model for categories
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
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub created_at: String,
}

impl Category {
    pub fn is_income(&self) -> bool {
        self.kind == CATEGORY_KIND_INCOME
    }

    pub fn is_expense(&self) -> bool {
        !self.is_income()
    }
}

/// Model for creating a new category
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub id: Option<String>,
    pub name: String,
    pub kind: String,
    pub created_at: Option<String>,
}

/// Model for updating a category
#[derive(AsChangeset, Serialize, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::categories)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub kind: Option<String>,
}
