// Application configuration loaded once at startup

use std::env;

/// Runtime configuration, read from the environment in one place and passed
/// explicitly into the services that need it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub cors_origins: String,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables with local-dev defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://auth_api.db".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "replace_with_strong_secret".to_string()),
            access_token_ttl_minutes: env::var("ACCESS_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            refresh_token_ttl_days: env::var("REFRESH_TOKEN_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(14),
            google_client_id: env::var("GOOGLE_OAUTH_CLIENT_ID").ok(),
            google_client_secret: env::var("GOOGLE_OAUTH_CLIENT_SECRET").ok(),
            cors_origins: env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                "http://localhost:3000,http://localhost:5173".to_string()
            }),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }
}
