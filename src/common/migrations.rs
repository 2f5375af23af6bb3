// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use tracing::info;

/// Run all database migrations
///
/// Idempotent: tables and indexes are created only if they don't exist.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_user_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database migration completed");

    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // password_hash is NULL for OAuth accounts; the (email, auth_provider)
    // constraint is the authoritative duplicate guard, handler pre-checks are
    // only the fast path.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_uid TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            username TEXT NOT NULL,
            password_hash TEXT,
            auth_provider TEXT NOT NULL DEFAULT 'email',
            avatar TEXT,
            last_active TEXT,
            created_at TEXT DEFAULT (datetime('now')),
            UNIQUE (email, auth_provider)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Usernames are only required to be unique among email-provider accounts
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username_email_provider
         ON users(username) WHERE auth_provider = 'email'",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
        .execute(pool)
        .await?;

    Ok(())
}
