//! Comment table access.
//!
//! The count and the page fetch are two independent statements; under
//! concurrent inserts they may see slightly different snapshots.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde_json::Value;

use entity::{comment, Comment};

use crate::pagination::{Pagination, Window};
use crate::submission::NewComment;
use crate::util::ts_to_rfc3339;

/// Hands out a store connection for the lifetime of one request.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ConnectionProvider {
    async fn connect(&self) -> Result<DatabaseConnection, DbErr>;
}

pub fn comment_json(c: &comment::Model) -> Value {
    serde_json::json!({
        "id": c.id,
        "page": c.page,
        "name": c.name,
        "comment": c.comment,
        "created_at": ts_to_rfc3339(c.created_at),
    })
}

pub async fn count_for_page(db: &DatabaseConnection, page: &str) -> Result<u64, DbErr> {
    Comment::find()
        .filter(comment::Column::Page.eq(page))
        .count(db)
        .await
}

/// Newest first; `id` breaks ties between rows sharing a timestamp.
pub async fn fetch_window(
    db: &DatabaseConnection,
    page: &str,
    window: Window,
) -> Result<Vec<comment::Model>, DbErr> {
    Comment::find()
        .filter(comment::Column::Page.eq(page))
        .order_by_desc(comment::Column::CreatedAt)
        .order_by_desc(comment::Column::Id)
        .offset(window.offset())
        .limit(window.limit())
        .all(db)
        .await
}

pub struct CommentPage {
    pub comments: Vec<comment::Model>,
    pub pagination: Pagination,
}

pub async fn list_page(db: &DatabaseConnection, page: &str, window: Window) -> Result<CommentPage, DbErr> {
    let total = count_for_page(db, page).await?;
    let comments = fetch_window(db, page, window).await?;

    Ok(CommentPage {
        comments,
        pagination: window.describe(total),
    })
}

pub async fn insert_comment(
    db: &DatabaseConnection,
    new: NewComment,
    created_at: i64,
) -> Result<comment::Model, DbErr> {
    let active = comment::ActiveModel {
        page: Set(new.page),
        name: Set(new.name),
        comment: Set(new.comment),
        created_at: Set(created_at),
        ..Default::default()
    };

    active.insert(db).await
}
