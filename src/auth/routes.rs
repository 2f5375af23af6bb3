//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /signup` - Email/password account creation
/// - `POST /login` - Email/password login
/// - `POST /google` - Continue with Google
/// - `POST /verify-token` - Access token verification
/// - `POST /refresh-token/` - Access token refresh
pub fn auth_routes() -> Router {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/google", post(handlers::continue_with_google))
        .route("/verify-token", post(handlers::verify_token))
        .route("/refresh-token/", post(handlers::refresh_token))
}
