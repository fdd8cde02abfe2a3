use chrono::{DateTime, Utc};
use sqlx::types::Json;

use crate::error::Result;
use crate::models::{Bookmark, NewBookmark};

use super::Db;

const COLUMNS: &str = "id, title, url, description, tags, timestamp, user_id";

/// Row shape; tags are stored as a JSON array
#[derive(sqlx::FromRow)]
struct BookmarkRow {
    id: i64,
    title: String,
    url: String,
    description: Option<String>,
    tags: Option<Json<Vec<String>>>,
    timestamp: DateTime<Utc>,
    user_id: String,
}

impl From<BookmarkRow> for Bookmark {
    fn from(row: BookmarkRow) -> Self {
        Bookmark {
            id: row.id,
            title: row.title,
            url: row.url,
            description: row.description,
            tags: row.tags.map(|Json(tags)| tags),
            timestamp: row.timestamp,
            user_id: row.user_id,
        }
    }
}

/// All bookmarks of a user, most recent first
pub async fn list(db: &Db, user_id: &str) -> Result<Vec<Bookmark>> {
    let rows = sqlx::query_as::<_, BookmarkRow>(&format!(
        "SELECT {COLUMNS} FROM bookmarks WHERE user_id = ? ORDER BY timestamp DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Bookmark::from).collect())
}

pub async fn create(db: &Db, user_id: &str, bookmark: &NewBookmark) -> Result<Bookmark> {
    let row = sqlx::query_as::<_, BookmarkRow>(&format!(
        "INSERT INTO bookmarks (title, url, description, tags, timestamp, user_id)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(&bookmark.title)
    .bind(&bookmark.url)
    .bind(&bookmark.description)
    .bind(bookmark.tags.as_ref().map(Json))
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(db)
    .await?;

    tracing::debug!("Bookmark {} created for user {}", row.id, user_id);
    Ok(row.into())
}

/// Returns the number of rows changed
pub async fn update(db: &Db, user_id: &str, id: i64, changes: &NewBookmark) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE bookmarks SET title = ?, url = ?, description = ?, tags = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(&changes.title)
    .bind(&changes.url)
    .bind(&changes.description)
    .bind(changes.tags.as_ref().map(Json))
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete(db: &Db, user_id: &str, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM bookmarks WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}
