//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// POST /signup request body
#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// POST /signup response body
#[derive(Serialize)]
pub struct SignupResponse {
    pub user_uid: String,
}

/// POST /login request body
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /google request body (authorization code from the client-side flow)
#[derive(Deserialize)]
pub struct GoogleOAuthRequest {
    pub code: String,
}

/// POST /verify-token request body
#[derive(Deserialize)]
pub struct VerificationRequest {
    pub token: String,
}

/// POST /verify-token response body
#[derive(Serialize)]
pub struct VerificationResponse {
    pub user_uid: String,
}

/// POST /refresh-token/ request body
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

/// Token pair returned by login, Google login and refresh
#[derive(Debug, Serialize)]
pub struct AuthTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user_uid: String,
}

/// Credentials row fetched for email/password login.
/// password_hash is NULL for OAuth-provisioned accounts.
#[derive(FromRow, Debug)]
pub struct UserCreds {
    pub user_uid: String,
    pub password_hash: Option<String>,
}

/// A user record about to be inserted by either signup flow.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: Option<String>,
    pub auth_provider: String,
    pub avatar: Option<String>,
}
