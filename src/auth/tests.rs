//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - Token minting, validation, expiry and kind enforcement
//! - Password hashing and verification
//! - The signup/login/OAuth flows against an in-memory store

#[cfg(test)]
mod tests {
    use super::super::*;
    use chrono::Duration;

    use super::super::service::{AuthError, AuthService};
    use super::super::store::memory::MemoryUserStore;
    use super::super::tokens::{TokenCodec, TokenError, TokenKind};
    use crate::common::AppConfig;
    use crate::services::google::VerifiedIdentity;

    const TEST_SECRET: &str = "test_secret_key";

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite://:memory:".to_string(),
            jwt_secret: TEST_SECRET.to_string(),
            access_token_ttl_minutes: 30,
            refresh_token_ttl_days: 14,
            google_client_id: None,
            google_client_secret: None,
            cors_origins: String::new(),
            port: 0,
        }
    }

    fn test_service() -> AuthService<MemoryUserStore> {
        AuthService::new(MemoryUserStore::new(), &test_config())
    }

    fn test_codec() -> TokenCodec {
        TokenCodec::new(TEST_SECRET, Duration::minutes(30), Duration::days(14))
    }

    // ---- Token codec ----

    #[test]
    fn test_access_token_round_trip() {
        let codec = test_codec();
        let token = codec
            .create_access_token("U_TESTUSER01")
            .expect("Failed to mint token");

        let claims = codec
            .validate(&token, TokenKind::Access)
            .expect("Failed to validate freshly minted token");

        assert_eq!(claims.sub, "U_TESTUSER01");
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Negative TTL puts the expiry deadline in the past
        let codec = TokenCodec::new(TEST_SECRET, Duration::minutes(-5), Duration::days(14));
        let token = codec
            .create_access_token("U_TESTUSER01")
            .expect("Failed to mint token");

        let result = test_codec().validate(&token, TokenKind::Access);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let other_codec = TokenCodec::new("wrong_secret_key", Duration::minutes(30), Duration::days(14));
        let token = other_codec
            .create_access_token("U_TESTUSER01")
            .expect("Failed to mint token");

        let result = test_codec().validate(&token, TokenKind::Access);
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let result = test_codec().validate("not-a-jwt", TokenKind::Access);
        assert!(matches!(result, Err(TokenError::Malformed)));
    }

    #[test]
    fn test_kind_claim_is_enforced() {
        let codec = test_codec();
        let access = codec.create_access_token("U_TESTUSER01").unwrap();
        let refresh = codec.create_refresh_token("U_TESTUSER01").unwrap();

        assert!(matches!(
            codec.validate(&access, TokenKind::Refresh),
            Err(TokenError::KindMismatch)
        ));
        assert!(matches!(
            codec.validate(&refresh, TokenKind::Access),
            Err(TokenError::KindMismatch)
        ));
    }

    // ---- Password hashing ----

    #[test]
    fn test_password_hash_and_verify() {
        let hash = password::hash_password("pw1").expect("Failed to hash password");
        assert_ne!(hash, "pw1");

        assert!(password::verify_password("pw1", &hash).unwrap());
        assert!(!password::verify_password("wrong", &hash).unwrap());
    }

    // ---- Signup flow ----

    #[tokio::test]
    async fn test_signup_creates_exactly_one_record() {
        let store = std::sync::Arc::new(MemoryUserStore::new());
        let service = AuthService::new(store.clone(), &test_config());

        let uid = service
            .signup("a@x.com", "alice", "pw1")
            .await
            .expect("Signup should succeed");
        assert!(uid.starts_with("U_"));

        let users = store.users().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user_uid, uid);
        assert_eq!(users[0].auth_provider, "email");
        // Only the hash is stored, never the plaintext
        let hash = users[0].password_hash.as_deref().unwrap();
        assert_ne!(hash, "pw1");
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_fails_regardless_of_username() {
        let service = test_service();
        service.signup("a@x.com", "alice", "pw1").await.unwrap();

        let result = service.signup("a@x.com", "different_name", "pw2").await;
        assert!(matches!(result, Err(AuthError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_signup_duplicate_username_fails() {
        let service = test_service();
        service.signup("a@x.com", "alice", "pw1").await.unwrap();

        let result = service.signup("b@x.com", "alice", "pw2").await;
        assert!(matches!(result, Err(AuthError::DuplicateUsername)));
    }

    // ---- Login flow ----

    #[tokio::test]
    async fn test_login_returns_tokens_embedding_user_uid() {
        let service = test_service();
        let uid = service.signup("a@x.com", "alice", "pw1").await.unwrap();

        let response = service
            .login("a@x.com", "pw1")
            .await
            .expect("Login should succeed");
        assert_eq!(response.user_uid, uid);

        // Both tokens independently decode to the same uid
        let codec = test_codec();
        let access = codec
            .validate(&response.access_token, TokenKind::Access)
            .unwrap();
        let refresh = codec
            .validate(&response.refresh_token, TokenKind::Refresh)
            .unwrap();
        assert_eq!(access.sub, uid);
        assert_eq!(refresh.sub, uid);
    }

    #[tokio::test]
    async fn test_login_wrong_password_fails() {
        let service = test_service();
        service.signup("a@x.com", "alice", "pw1").await.unwrap();

        let result = service.login("a@x.com", "wrong").await;
        assert!(matches!(result, Err(AuthError::IncorrectPassword)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_fails() {
        let service = test_service();

        let result = service.login("nobody@x.com", "pw1").await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    // ---- Google login flow ----

    #[tokio::test]
    async fn test_google_login_provisions_account_from_verified_identity() {
        let store = std::sync::Arc::new(MemoryUserStore::new());
        let service = AuthService::new(store.clone(), &test_config());

        let response = service
            .login_google(VerifiedIdentity {
                email: Some("bob@x.com".to_string()),
                picture: Some("https://example.com/bob.png".to_string()),
            })
            .await
            .expect("Google login should succeed");

        let codec = test_codec();
        let claims = codec
            .validate(&response.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(claims.sub, response.user_uid);

        let users = store.users().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].auth_provider, "google");
        assert_eq!(users[0].username, "bob"); // local part of the email
        assert_eq!(
            users[0].avatar.as_deref(),
            Some("https://example.com/bob.png")
        );
        assert!(users[0].password_hash.is_none());
    }

    #[tokio::test]
    async fn test_google_login_is_idempotent_per_email() {
        let store = std::sync::Arc::new(MemoryUserStore::new());
        let service = AuthService::new(store.clone(), &test_config());
        let identity = VerifiedIdentity {
            email: Some("bob@x.com".to_string()),
            picture: Some("https://example.com/bob.png".to_string()),
        };

        let first = service.login_google(identity.clone()).await.unwrap();
        let second = service.login_google(identity).await.unwrap();

        assert_eq!(first.user_uid, second.user_uid);

        // Second login only touches last_active, never inserts
        let users = store.users().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].touch_count, 1);
    }

    #[tokio::test]
    async fn test_google_login_without_email_claim_fails() {
        let service = test_service();

        let result = service
            .login_google(VerifiedIdentity {
                email: None,
                picture: None,
            })
            .await;
        assert!(matches!(result, Err(AuthError::MissingEmailClaim)));
    }

    // ---- Verify and refresh ----

    #[tokio::test]
    async fn test_verify_token_returns_user_uid() {
        let service = test_service();
        let uid = service.signup("a@x.com", "alice", "pw1").await.unwrap();
        let response = service.login("a@x.com", "pw1").await.unwrap();

        let verified_uid = service.verify_token(&response.access_token).unwrap();
        assert_eq!(verified_uid, uid);
    }

    #[tokio::test]
    async fn test_verify_rejects_refresh_token() {
        let service = test_service();
        service.signup("a@x.com", "alice", "pw1").await.unwrap();
        let response = service.login("a@x.com", "pw1").await.unwrap();

        let result = service.verify_token(&response.refresh_token);
        assert!(matches!(
            result,
            Err(AuthError::Token(TokenError::KindMismatch))
        ));
    }

    #[tokio::test]
    async fn test_refresh_echoes_same_refresh_token() {
        let service = test_service();
        let uid = service.signup("a@x.com", "alice", "pw1").await.unwrap();
        let login = service.login("a@x.com", "pw1").await.unwrap();

        let refreshed = service.refresh_token(&login.refresh_token).unwrap();

        assert_eq!(refreshed.refresh_token, login.refresh_token);
        assert_eq!(refreshed.user_uid, uid);

        // The new access token independently validates to the same uid
        let claims = test_codec()
            .validate(&refreshed.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(claims.sub, uid);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let service = test_service();
        service.signup("a@x.com", "alice", "pw1").await.unwrap();
        let response = service.login("a@x.com", "pw1").await.unwrap();

        let result = service.refresh_token(&response.access_token);
        assert!(matches!(
            result,
            Err(AuthError::Token(TokenError::KindMismatch))
        ));
    }

    #[tokio::test]
    async fn test_refresh_rejects_malformed_token() {
        let service = test_service();

        let result = service.refresh_token("garbage");
        assert!(matches!(
            result,
            Err(AuthError::Token(TokenError::Malformed))
        ));
    }
}
