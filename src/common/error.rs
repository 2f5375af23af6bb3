// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use crate::auth::service::AuthError;
use crate::auth::tokens::TokenError;
use crate::services::google::GoogleError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    InternalServer(String),
    ServiceUnavailable(String),
    DatabaseError(sqlx::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service Unavailable: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                msg,
                "SERVICE_UNAVAILABLE",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail => {
                ApiError::BadRequest("Email already registered".to_string())
            }
            AuthError::DuplicateUsername => {
                ApiError::BadRequest("Username already taken".to_string())
            }
            AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            AuthError::IncorrectPassword => {
                ApiError::Unauthorized("Incorrect password".to_string())
            }
            AuthError::MissingEmailClaim => {
                ApiError::BadRequest("Missing email claim in identity assertion".to_string())
            }
            AuthError::Token(e) => e.into(),
            AuthError::Store(e) => ApiError::DatabaseError(e),
            AuthError::Password(msg) => {
                error!(error = %msg, "Password hashing failure");
                ApiError::InternalServer("Password processing failed".to_string())
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        let msg = match err {
            TokenError::Expired => "Token has expired",
            TokenError::Invalid => "Invalid token signature",
            TokenError::Malformed => "Malformed token",
            TokenError::KindMismatch => "Token kind mismatch",
            TokenError::Encoding(e) => {
                error!(error = %e, "JWT encoding error");
                return ApiError::InternalServer("Token creation failed".to_string());
            }
        };
        ApiError::Unauthorized(msg.to_string())
    }
}

impl From<GoogleError> for ApiError {
    fn from(err: GoogleError) -> Self {
        match err {
            GoogleError::NotConfigured => {
                ApiError::ServiceUnavailable("Google OAuth not configured".to_string())
            }
            GoogleError::ExchangeFailed(msg) => {
                error!(error = %msg, "Google token exchange failed");
                ApiError::ServiceUnavailable("Google token exchange failed".to_string())
            }
            GoogleError::MissingIdToken => {
                ApiError::BadRequest("Missing id_token in response".to_string())
            }
            GoogleError::InvalidIdToken(msg) => {
                ApiError::BadRequest(format!("Invalid identity assertion: {}", msg))
            }
        }
    }
}
