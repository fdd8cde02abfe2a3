pub mod bookmarks;
pub mod notes;
pub mod pool;
pub mod reminders;
pub mod todos;
pub mod users;

pub use pool::create_pool;

use sqlx::SqlitePool;

/// Database handle type (the pool is internally reference counted)
pub type Db = SqlitePool;

/// Apply the embedded migrations
pub async fn run_migrations(db: &Db) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(db).await?;
    tracing::info!("Migrations complete");
    Ok(())
}
