use crate::error::Result;
use crate::models::{NewTodo, Todo, TodoUpdate};

use super::Db;

const COLUMNS: &str = "id, title, completed, priority, due_date, reminder_time, category, user_id";

/// All todos of a user, newest first
pub async fn list(db: &Db, user_id: &str) -> Result<Vec<Todo>> {
    let todos = sqlx::query_as::<_, Todo>(&format!(
        "SELECT {COLUMNS} FROM todos WHERE user_id = ? ORDER BY id DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(todos)
}

pub async fn create(db: &Db, user_id: &str, todo: &NewTodo) -> Result<Todo> {
    let created = sqlx::query_as::<_, Todo>(&format!(
        "INSERT INTO todos (title, completed, priority, due_date, reminder_time, category, user_id)
         VALUES (?, FALSE, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(&todo.title)
    .bind(todo.priority)
    .bind(todo.due_date)
    .bind(&todo.reminder_time)
    .bind(todo.category)
    .bind(user_id)
    .fetch_one(db)
    .await?;

    tracing::debug!("Todo {} created for user {}", created.id, user_id);
    Ok(created)
}

/// Replace the editable fields of a todo owned by `user_id`
///
/// Returns the number of rows changed (0 if the todo is missing or not theirs).
pub async fn update(db: &Db, user_id: &str, id: i64, changes: &TodoUpdate) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE todos
         SET title = ?, priority = ?, due_date = ?, reminder_time = ?, category = ?,
             completed = COALESCE(?, completed)
         WHERE id = ? AND user_id = ?",
    )
    .bind(&changes.title)
    .bind(changes.priority)
    .bind(changes.due_date)
    .bind(&changes.reminder_time)
    .bind(changes.category)
    .bind(changes.completed)
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

/// Flip `completed` in place
pub async fn toggle(db: &Db, user_id: &str, id: i64) -> Result<u64> {
    let result = sqlx::query("UPDATE todos SET completed = NOT completed WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete(db: &Db, user_id: &str, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}
