//! Credential store access
//!
//! The auth service reaches the user table through the small `UserStore`
//! trait so the backend can be swapped and the flows unit-tested against an
//! in-memory fake. The SQLite implementation checks connections out of the
//! pool per query; the checkout is released on every exit path.

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

use super::models::{NewUser, UserCreds};
use crate::common::generate_user_uid;

/// Which unique constraint an insert ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated on {0:?}")]
    UniqueViolation(UniqueField),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Query interface over the user-record store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn email_exists(&self, email: &str, auth_provider: &str) -> Result<bool, StoreError>;

    async fn username_exists(
        &self,
        username: &str,
        auth_provider: &str,
    ) -> Result<bool, StoreError>;

    /// Credentials for email/password login (email-provider records only).
    async fn get_user_creds(&self, email: &str) -> Result<Option<UserCreds>, StoreError>;

    async fn get_user_uid(
        &self,
        email: &str,
        auth_provider: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Insert a new record and return its generated uid. A uniqueness
    /// violation that raced past the caller's pre-check comes back as
    /// `UniqueViolation` so the caller can surface a duplicate error instead
    /// of a plain database failure.
    async fn insert_user(&self, user: NewUser) -> Result<String, StoreError>;

    async fn touch_last_active(&self, user_uid: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for std::sync::Arc<T> {
    async fn email_exists(&self, email: &str, auth_provider: &str) -> Result<bool, StoreError> {
        (**self).email_exists(email, auth_provider).await
    }

    async fn username_exists(
        &self,
        username: &str,
        auth_provider: &str,
    ) -> Result<bool, StoreError> {
        (**self).username_exists(username, auth_provider).await
    }

    async fn get_user_creds(&self, email: &str) -> Result<Option<UserCreds>, StoreError> {
        (**self).get_user_creds(email).await
    }

    async fn get_user_uid(
        &self,
        email: &str,
        auth_provider: &str,
    ) -> Result<Option<String>, StoreError> {
        (**self).get_user_uid(email, auth_provider).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<String, StoreError> {
        (**self).insert_user(user).await
    }

    async fn touch_last_active(&self, user_uid: &str) -> Result<(), StoreError> {
        (**self).touch_last_active(user_uid).await
    }
}

/// SQLite-backed store used in production.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn email_exists(&self, email: &str, auth_provider: &str) -> Result<bool, StoreError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM users WHERE email = ? AND auth_provider = ?")
                .bind(email)
                .bind(auth_provider)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    async fn username_exists(
        &self,
        username: &str,
        auth_provider: &str,
    ) -> Result<bool, StoreError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM users WHERE username = ? AND auth_provider = ?")
                .bind(username)
                .bind(auth_provider)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    async fn get_user_creds(&self, email: &str) -> Result<Option<UserCreds>, StoreError> {
        let creds = sqlx::query_as::<_, UserCreds>(
            "SELECT user_uid, password_hash FROM users WHERE email = ? AND auth_provider = 'email'",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(creds)
    }

    async fn get_user_uid(
        &self,
        email: &str,
        auth_provider: &str,
    ) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT user_uid FROM users WHERE email = ? AND auth_provider = ?")
                .bind(email)
                .bind(auth_provider)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(uid,)| uid))
    }

    async fn insert_user(&self, user: NewUser) -> Result<String, StoreError> {
        let user_uid = generate_user_uid();

        let result = sqlx::query(
            "INSERT INTO users (user_uid, email, username, password_hash, auth_provider, avatar, last_active)
             VALUES (?, ?, ?, ?, ?, ?, datetime('now'))",
        )
        .bind(&user_uid)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.auth_provider)
        .bind(&user.avatar)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user_uid),
            Err(e) => Err(classify_unique_violation(e)),
        }
    }

    async fn touch_last_active(&self, user_uid: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET last_active = datetime('now') WHERE user_uid = ?")
            .bind(user_uid)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Map a SQLite unique-constraint failure onto the column that caused it.
fn classify_unique_violation(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        let msg = db_err.message();
        if msg.contains("UNIQUE constraint failed") {
            if msg.contains("users.username") {
                return StoreError::UniqueViolation(UniqueField::Username);
            }
            return StoreError::UniqueViolation(UniqueField::Email);
        }
    }
    StoreError::Database(e)
}
