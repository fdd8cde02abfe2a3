use chrono::Utc;

use crate::error::Result;
use crate::models::{NewNote, Note};

use super::Db;

/// All notes of a user, most recent first
pub async fn list(db: &Db, user_id: &str) -> Result<Vec<Note>> {
    let notes = sqlx::query_as::<_, Note>(
        "SELECT id, title, content, timestamp, user_id
         FROM notes WHERE user_id = ? ORDER BY timestamp DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(notes)
}

pub async fn create(db: &Db, user_id: &str, note: &NewNote) -> Result<Note> {
    let created = sqlx::query_as::<_, Note>(
        "INSERT INTO notes (title, content, timestamp, user_id)
         VALUES (?, ?, ?, ?)
         RETURNING id, title, content, timestamp, user_id",
    )
    .bind(&note.title)
    .bind(&note.content)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(db)
    .await?;

    tracing::debug!("Note {} created for user {}", created.id, user_id);
    Ok(created)
}

/// Returns the number of rows changed
pub async fn update(db: &Db, user_id: &str, id: i64, changes: &NewNote) -> Result<u64> {
    let result = sqlx::query("UPDATE notes SET title = ?, content = ? WHERE id = ? AND user_id = ?")
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete(db: &Db, user_id: &str, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}
