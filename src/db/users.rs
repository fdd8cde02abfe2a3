use crate::error::Result;
use crate::models::{NewUser, User};

use super::Db;

/// Look up the account registered with this phone number
///
/// Both sides are compared in normalized (digits-only) form.
pub async fn find_by_phone_number(db: &Db, phone_number: &str) -> Result<Option<User>> {
    let normalized = User::normalize_phone_number(phone_number);
    if normalized.is_empty() {
        return Ok(None);
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, phone_number FROM users WHERE phone_number = ?",
    )
    .bind(normalized)
    .fetch_optional(db)
    .await?;

    Ok(user)
}

/// Insert an account, normalizing its phone number
pub async fn insert(db: &Db, new_user: &NewUser) -> Result<User> {
    let phone_number = new_user
        .phone_number
        .as_deref()
        .map(User::normalize_phone_number)
        .filter(|p| !p.is_empty());

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email, phone_number, created_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id, name, email, phone_number",
    )
    .bind(&new_user.id)
    .bind(&new_user.name)
    .bind(&new_user.email)
    .bind(phone_number)
    .bind(chrono::Utc::now())
    .fetch_one(db)
    .await?;

    tracing::info!("User {} inserted", user.id);
    Ok(user)
}
