use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A visitor comment attached to one page path of the site.
///
/// Rows are insert-only: nothing in the API updates or deletes them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    /// Store-assigned, increases with every insert.
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Page path (e.g. "/", "/about").
    pub page: String,

    /// Trimmed display name; `None` when the visitor left it blank.
    pub name: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub comment: String,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
