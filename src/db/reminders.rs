use crate::error::Result;
use crate::models::{NewReminder, Reminder};

use super::Db;

const COLUMNS: &str = "id, title, description, time, date, repeat, enabled, category, user_id";

/// All reminders of a user, newest first
pub async fn list(db: &Db, user_id: &str) -> Result<Vec<Reminder>> {
    let reminders = sqlx::query_as::<_, Reminder>(&format!(
        "SELECT {COLUMNS} FROM reminders WHERE user_id = ? ORDER BY id DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(reminders)
}

pub async fn create(db: &Db, user_id: &str, reminder: &NewReminder) -> Result<Reminder> {
    let created = sqlx::query_as::<_, Reminder>(&format!(
        "INSERT INTO reminders (title, description, time, date, repeat, enabled, category, user_id)
         VALUES (?, ?, ?, ?, ?, TRUE, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(&reminder.title)
    .bind(&reminder.description)
    .bind(reminder.time)
    .bind(reminder.date)
    .bind(reminder.repeat)
    .bind(reminder.category)
    .bind(user_id)
    .fetch_one(db)
    .await?;

    tracing::debug!("Reminder {} created for user {}", created.id, user_id);
    Ok(created)
}

/// Returns the number of rows changed
pub async fn update(db: &Db, user_id: &str, id: i64, changes: &NewReminder) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE reminders
         SET title = ?, description = ?, time = ?, date = ?, repeat = ?, category = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(changes.time)
    .bind(changes.date)
    .bind(changes.repeat)
    .bind(changes.category)
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

/// Flip `enabled` in place
pub async fn toggle(db: &Db, user_id: &str, id: i64) -> Result<u64> {
    let result =
        sqlx::query("UPDATE reminders SET enabled = NOT enabled WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;

    Ok(result.rows_affected())
}

pub async fn delete(db: &Db, user_id: &str, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM reminders WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}
