use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// An institution transactions and savings contributions point at by name.
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
#[diesel(table_name = crate::schema::banks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::banks)]
#[serde(rename_all = "camelCase")]
pub struct NewBank {
    pub id: Option<String>,
    pub name: String,
    pub created_at: Option<String>,
}
