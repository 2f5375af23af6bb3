//! Authentication handlers

use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{debug, info};

use super::models::{
    GoogleOAuthRequest, LoginRequest, RefreshRequest, SignupRequest, SignupResponse,
    VerificationRequest, VerificationResponse,
};
use crate::common::{safe_email_log, safe_token_log, ApiError, AppState};

/// POST /signup
/// Email/password account creation. No tokens are issued here; signup and
/// login are separate steps.
///
/// # Request Body
/// ```json
/// {
///   "email": "a@x.com",
///   "username": "alice",
///   "password": "pw1"
/// }
/// ```
///
/// # Response (201)
/// ```json
/// {
///   "user_uid": "U_K7NP3XY2M4"
/// }
/// ```
pub async fn signup(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    debug!(email = %safe_email_log(&payload.email), "Received signup request");

    let user_uid = state
        .auth_service
        .signup(&payload.email, &payload.username, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(SignupResponse { user_uid })))
}

/// POST /login
/// Email/password login. Returns an access/refresh token pair.
///
/// # Response (200)
/// ```json
/// {
///   "access_token": "<jwt>",
///   "refresh_token": "<jwt>",
///   "user_uid": "U_K7NP3XY2M4"
/// }
/// ```
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<super::models::AuthTokenResponse>, ApiError> {
    debug!(email = %safe_email_log(&payload.email), "Received login request");

    let response = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(response))
}

/// POST /google
/// Continue with Google. Exchanges the authorization code for a verified
/// identity, then logs in (provisioning an account on first contact).
///
/// # Request Body
/// ```json
/// {
///   "code": "<authorization code>"
/// }
/// ```
pub async fn continue_with_google(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<GoogleOAuthRequest>,
) -> Result<(StatusCode, Json<super::models::AuthTokenResponse>), ApiError> {
    info!("Received Google auth request");

    let identity = state
        .google_service
        .exchange_code_for_identity(&payload.code)
        .await?;

    let response = state.auth_service.login_google(identity).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /verify-token
/// Validate an access token and return the uid it asserts.
pub async fn verify_token(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<VerificationRequest>,
) -> Result<Json<VerificationResponse>, ApiError> {
    debug!(token = %safe_token_log(&payload.token), "Received token verification request");

    let user_uid = state.auth_service.verify_token(&payload.token)?;

    Ok(Json(VerificationResponse { user_uid }))
}

/// POST /refresh-token/
/// Mint a new access token from a valid refresh token. The refresh token is
/// echoed back unchanged.
pub async fn refresh_token(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<super::models::AuthTokenResponse>, ApiError> {
    debug!(token = %safe_token_log(&payload.token), "Received token refresh request");

    let response = state.auth_service.refresh_token(&payload.token)?;

    Ok(Json(response))
}
