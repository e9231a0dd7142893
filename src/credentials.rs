//! Google service account credentials
//!
//! Loads the service account JSON once at startup and mints OAuth2 access
//! tokens with the JWT bearer grant. Tokens are cached until shortly before
//! they expire.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{Error, Result};

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 300;

/// Source of OAuth2 bearer tokens for Google APIs
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get a currently valid access token
    ///
    /// # Errors
    ///
    /// Returns error if no token can be obtained
    async fn access_token(&self) -> Result<String>;
}

/// Service account JSON structure
#[derive(Deserialize)]
struct ServiceAccountFile {
    client_email: String,
    private_key: String,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

/// JWT claims for Google OAuth
#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

/// Token response from Google
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Cached token info
struct TokenInfo {
    access_token: String,
    expires_at: i64,
}

/// Credential-backed client for Google APIs
pub struct ServiceAccount {
    client_email: String,
    project_id: Option<String>,
    token_uri: String,
    key: jsonwebtoken::EncodingKey,
    scope: String,
    client: reqwest::Client,
    token: Mutex<Option<TokenInfo>>,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl ServiceAccount {
    /// Load a service account file and prepare it for the given OAuth scopes
    ///
    /// `timeout` bounds each token request.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, malformed, or the key is not RSA PEM
    pub fn from_file(path: &Path, scopes: &[&str], timeout: Duration) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Credentials(format!(
                "failed to read service account {}: {e}",
                path.display()
            ))
        })?;

        Self::from_json(&content, scopes, timeout)
    }

    /// Parse service account JSON
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or the key is not RSA PEM
    pub fn from_json(json: &str, scopes: &[&str], timeout: Duration) -> Result<Self> {
        let file: ServiceAccountFile = serde_json::from_str(json)
            .map_err(|e| Error::Credentials(format!("failed to parse service account: {e}")))?;

        let private_key = SecretString::from(file.private_key);
        let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_key.expose_secret().as_bytes())
            .map_err(|e| Error::Credentials(format!("invalid private key: {e}")))?;

        Ok(Self {
            client_email: file.client_email,
            project_id: file.project_id,
            token_uri: file
                .token_uri
                .unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
            key,
            scope: scopes.join(" "),
            client: reqwest::Client::builder().timeout(timeout).build()?,
            token: Mutex::new(None),
        })
    }

    /// Service account email
    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Project the account belongs to, when present in the file
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn create_jwt(&self, now: i64) -> Result<String> {
        let header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256);
        let claims = JwtClaims {
            iss: &self.client_email,
            scope: &self.scope,
            aud: &self.token_uri,
            exp: now + TOKEN_LIFETIME_SECS,
            iat: now,
        };

        jsonwebtoken::encode(&header, &claims, &self.key)
            .map_err(|e| Error::Credentials(format!("JWT encoding failed: {e}")))
    }
}

#[async_trait]
impl TokenProvider for ServiceAccount {
    /// Get a valid access token, refreshing it when close to expiry
    async fn access_token(&self) -> Result<String> {
        let now = chrono::Utc::now().timestamp();

        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.expires_at > now + REFRESH_MARGIN_SECS {
                return Ok(token.access_token.clone());
            }
        }

        let jwt = self.create_jwt(now)?;

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ])
            .send()
            .await
            .map_err(|e| Error::Credentials(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Credentials(format!(
                "token request failed: {status} - {body}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Credentials(format!("token parse error: {e}")))?;

        tracing::debug!(account = %self.client_email, "refreshed access token");

        *guard = Some(TokenInfo {
            access_token: token_response.access_token.clone(),
            expires_at: now + token_response.expires_in,
        });

        Ok(token_response.access_token)
    }
}
