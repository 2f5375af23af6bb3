// src/services/google.rs
//! Google OAuth exchange
//!
//! Trades a client-side authorization code for Google's identity assertion
//! (the `id_token`), verifies the assertion's RS256 signature against
//! Google's published JWKS and its audience against the registered client
//! id, and hands only verified claims downstream.

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, warn};

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const JWKS_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/certs";
const ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

// Sentinel redirect for codes obtained through the postMessage flow
const REDIRECT_URI: &str = "postmessage";

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("Google OAuth not configured")]
    NotConfigured,

    #[error("token exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("missing id_token in token response")]
    MissingIdToken,

    #[error("invalid identity assertion: {0}")]
    InvalidIdToken(String),
}

/// Identity claims extracted from a signature-checked id_token. Nothing in
/// this struct comes from an unverified source.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub email: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    expires_in: Option<i64>,
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    email: Option<String>,
    email_verified: Option<bool>,
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: Option<String>,
    n: String,
    e: String,
}

#[derive(Clone)]
pub struct GoogleAuthService {
    client: Client,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl GoogleAuthService {
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            client_id,
            client_secret,
        }
    }

    fn credentials(&self) -> Result<(&str, &str), GoogleError> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(GoogleError::NotConfigured),
        }
    }

    /// Exchange an authorization code for a verified identity.
    pub async fn exchange_code_for_identity(
        &self,
        code: &str,
    ) -> Result<VerifiedIdentity, GoogleError> {
        let (client_id, client_secret) = self.credentials()?;

        let params = [
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| GoogleError::ExchangeFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(GoogleError::ExchangeFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let token_response = response
            .json::<TokenExchangeResponse>()
            .await
            .map_err(|e| GoogleError::ExchangeFailed(e.to_string()))?;

        debug!(
            expires_in = ?token_response.expires_in,
            "Token exchange succeeded"
        );

        let id_token = token_response.id_token.ok_or(GoogleError::MissingIdToken)?;

        let claims = self.verify_id_token(&id_token, client_id).await?;

        if claims.email_verified == Some(false) {
            warn!("Google identity assertion carries an unverified email address");
        }

        Ok(VerifiedIdentity {
            email: claims.email,
            picture: claims.picture,
        })
    }

    /// Verify the assertion's signature against Google's JWKS and check the
    /// audience, issuer and expiry claims.
    async fn verify_id_token(
        &self,
        id_token: &str,
        client_id: &str,
    ) -> Result<IdTokenClaims, GoogleError> {
        let header =
            decode_header(id_token).map_err(|e| GoogleError::InvalidIdToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| GoogleError::InvalidIdToken("missing kid header".to_string()))?;

        let jwks = self.fetch_jwks().await?;
        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.kid.as_deref() == Some(kid.as_str()))
            .ok_or_else(|| GoogleError::InvalidIdToken("unknown signing key".to_string()))?;

        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| GoogleError::InvalidIdToken(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[client_id]);
        validation.set_issuer(&ISSUERS);

        let data = decode::<IdTokenClaims>(id_token, &key, &validation).map_err(|e| {
            warn!(error = %e, "Identity assertion validation failed");
            GoogleError::InvalidIdToken(e.to_string())
        })?;

        debug!("Identity assertion signature and audience verified");

        Ok(data.claims)
    }

    async fn fetch_jwks(&self) -> Result<Jwks, GoogleError> {
        // A cert-endpoint outage is an upstream availability problem, not an
        // assertion problem
        let response = self
            .client
            .get(JWKS_ENDPOINT)
            .send()
            .await
            .map_err(|e| GoogleError::ExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GoogleError::ExchangeFailed(format!(
                "JWKS fetch returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Jwks>()
            .await
            .map_err(|e| GoogleError::ExchangeFailed(e.to_string()))
    }
}
