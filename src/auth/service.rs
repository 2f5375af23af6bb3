//! Auth service orchestration
//!
//! The three entry flows (signup, password login, Google login) and the two
//! token operations all converge here onto a single token-issuance contract.
//! The service is generic over the credential store so the flows run
//! unchanged against SQLite in production and an in-memory fake in tests.

use chrono::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::models::{AuthTokenResponse, NewUser};
use super::password;
use super::store::{StoreError, UniqueField, UserStore};
use super::tokens::{TokenCodec, TokenError, TokenKind};
use crate::common::{safe_email_log, AppConfig};
use crate::services::google::VerifiedIdentity;

const EMAIL_PROVIDER: &str = "email";
const GOOGLE_PROVIDER: &str = "google";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("username already taken")]
    DuplicateUsername,

    #[error("user not found")]
    UserNotFound,

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("missing email claim in identity assertion")]
    MissingEmailClaim,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("store error: {0}")]
    Store(sqlx::Error),

    #[error("password hashing failed: {0}")]
    Password(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation(UniqueField::Email) => AuthError::DuplicateEmail,
            StoreError::UniqueViolation(UniqueField::Username) => AuthError::DuplicateUsername,
            StoreError::Database(e) => AuthError::Store(e),
        }
    }
}

pub struct AuthService<S: UserStore> {
    store: S,
    tokens: TokenCodec,
}

impl<S: UserStore> AuthService<S> {
    pub fn new(store: S, config: &AppConfig) -> Self {
        let tokens = TokenCodec::new(
            &config.jwt_secret,
            Duration::minutes(config.access_token_ttl_minutes),
            Duration::days(config.refresh_token_ttl_days),
        );
        Self { store, tokens }
    }

    /// Email/password signup. Creates the record; tokens are issued by a
    /// separate login call.
    pub async fn signup(
        &self,
        email: &str,
        username: &str,
        plain_password: &str,
    ) -> Result<String, AuthError> {
        if self.store.email_exists(email, EMAIL_PROVIDER).await? {
            return Err(AuthError::DuplicateEmail);
        }
        if self.store.username_exists(username, EMAIL_PROVIDER).await? {
            return Err(AuthError::DuplicateUsername);
        }

        let password_hash =
            password::hash_password(plain_password).map_err(|e| AuthError::Password(e.to_string()))?;

        // The pre-checks above are only a fast path; a concurrent signup can
        // still race past them and hits the store's unique constraints, which
        // come back as the same duplicate errors.
        let user_uid = self
            .store
            .insert_user(NewUser {
                email: email.to_string(),
                username: username.to_string(),
                password_hash: Some(password_hash),
                auth_provider: EMAIL_PROVIDER.to_string(),
                avatar: None,
            })
            .await?;

        info!(
            user_uid = %user_uid,
            email = %safe_email_log(email),
            "New account created via email signup"
        );

        Ok(user_uid)
    }

    /// Email/password login.
    pub async fn login(
        &self,
        email: &str,
        plain_password: &str,
    ) -> Result<AuthTokenResponse, AuthError> {
        let creds = self
            .store
            .get_user_creds(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let stored_hash = creds
            .password_hash
            .as_deref()
            .ok_or(AuthError::IncorrectPassword)?;

        let matches = password::verify_password(plain_password, stored_hash)
            .map_err(|e| AuthError::Password(e.to_string()))?;
        if !matches {
            warn!(email = %safe_email_log(email), "Login failed: incorrect password");
            return Err(AuthError::IncorrectPassword);
        }

        let response = self.issue_token_pair(&creds.user_uid)?;
        self.store.touch_last_active(&creds.user_uid).await?;

        info!(user_uid = %creds.user_uid, "Login successful");

        Ok(response)
    }

    /// Google login with an already-verified identity assertion. Reuses the
    /// existing google-provider record for the email, or provisions one with
    /// the email's local part as username.
    pub async fn login_google(
        &self,
        identity: VerifiedIdentity,
    ) -> Result<AuthTokenResponse, AuthError> {
        let email = identity.email.ok_or(AuthError::MissingEmailClaim)?;

        let user_uid = match self.store.get_user_uid(&email, GOOGLE_PROVIDER).await? {
            Some(uid) => {
                self.store.touch_last_active(&uid).await?;
                uid
            }
            None => {
                // Derived usernames are not checked against existing ones
                let username = email.split('@').next().unwrap_or(&email).to_string();
                let uid = self
                    .store
                    .insert_user(NewUser {
                        email: email.clone(),
                        username,
                        password_hash: None,
                        auth_provider: GOOGLE_PROVIDER.to_string(),
                        avatar: identity.picture,
                    })
                    .await?;

                info!(
                    user_uid = %uid,
                    email = %safe_email_log(&email),
                    "New account created via Google OAuth"
                );

                uid
            }
        };

        self.issue_token_pair(&user_uid)
    }

    /// Validate a caller-supplied access token.
    pub fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.tokens.validate(token, TokenKind::Access)?;
        Ok(claims.sub)
    }

    /// Mint a fresh access token from a valid refresh token. The refresh
    /// token is never rotated; the caller gets the same one echoed back.
    pub fn refresh_token(&self, token: &str) -> Result<AuthTokenResponse, AuthError> {
        let claims = self.tokens.validate(token, TokenKind::Refresh)?;
        let access_token = self.tokens.create_access_token(&claims.sub)?;

        Ok(AuthTokenResponse {
            access_token,
            refresh_token: token.to_string(),
            user_uid: claims.sub,
        })
    }

    fn issue_token_pair(&self, user_uid: &str) -> Result<AuthTokenResponse, AuthError> {
        Ok(AuthTokenResponse {
            access_token: self.tokens.create_access_token(user_uid)?,
            refresh_token: self.tokens.create_refresh_token(user_uid)?,
            user_uid: user_uid.to_string(),
        })
    }
}
