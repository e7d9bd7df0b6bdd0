// =============================================================================
// SERVICE ACCOUNT AUTHENTICATION
// =============================================================================
//
// Signs in as a Google service account. Letters then land in the service
// account's own Drive, or, with domain-wide delegation and `subject` set,
// in the Drive of the impersonated user.
//
// **Environment Variables:**
// - `GOOGLE_SERVICE_ACCOUNT_KEY` - Path to service account JSON file
// - `GOOGLE_SERVICE_ACCOUNT_JSON` - Service account JSON content (alternative)
// - `GOOGLE_IMPERSONATE_USER` - Optional user to impersonate (needs domain-wide
//   delegation for the service account)

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

use super::DRIVE_FILE_SCOPE;
use crate::core::auth::{AuthError, IdentityProvider, UserAccount};
use async_trait::async_trait;

/// Service account credentials from the JSON key file.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountCredentials {
    /// The service account email (used as issuer in JWT).
    client_email: String,

    /// The private key in PEM format.
    private_key: String,

    /// The token URI (where to exchange JWT for access token).
    token_uri: String,
}

/// JWT claims for Google OAuth2.
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    scope: String,
    aud: String,
    /// User to act on behalf of (domain-wide delegation only).
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    iat: u64,
    /// At most one hour after `iat`.
    exp: u64,
}

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

const REVOKE_URI: &str = "https://oauth2.googleapis.com/revoke";

/// Cached access token with expiration.
struct CachedToken {
    token: String,
    expires_at: SystemTime,
}

pub struct ServiceAccountProvider {
    credentials: ServiceAccountCredentials,
    subject: Option<String>,
    client: Client,
    revoke_uri: String,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl ServiceAccountProvider {
    /// Creates a provider from a JSON key file path.
    pub async fn from_file(path: &str, subject: Option<String>) -> Result<Self, AuthError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AuthError::SignInFailed(format!("Cannot read {}: {}", path, e)))?;
        Self::from_json(&content, subject)
    }

    /// Creates a provider from JSON key content.
    pub fn from_json(json: &str, subject: Option<String>) -> Result<Self, AuthError> {
        let credentials: ServiceAccountCredentials = serde_json::from_str(json)
            .map_err(|e| AuthError::SignInFailed(format!("Invalid service account key: {}", e)))?;
        Ok(Self {
            credentials,
            subject,
            client: Client::new(),
            revoke_uri: REVOKE_URI.to_string(),
            cached_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Creates from environment variables. `Ok(None)` when no key is configured.
    pub async fn from_env() -> Result<Option<Self>, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok()).await
    }

    async fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, AuthError> {
        let subject = lookup("GOOGLE_IMPERSONATE_USER").filter(|user| !user.trim().is_empty());

        if let Some(path) = lookup("GOOGLE_SERVICE_ACCOUNT_KEY") {
            return Self::from_file(&path, subject).await.map(Some);
        }

        if let Some(json) = lookup("GOOGLE_SERVICE_ACCOUNT_JSON") {
            return Self::from_json(&json, subject).map(Some);
        }

        Ok(None)
    }

    fn account(&self) -> UserAccount {
        match &self.subject {
            Some(user) => UserAccount {
                email: user.clone(),
                display_name: Some(format!("via {}", self.credentials.client_email)),
            },
            None => UserAccount {
                email: self.credentials.client_email.clone(),
                display_name: None,
            },
        }
    }

    fn claims(&self, now: u64) -> JwtClaims {
        JwtClaims {
            iss: self.credentials.client_email.clone(),
            scope: DRIVE_FILE_SCOPE.to_string(),
            aud: self.credentials.token_uri.clone(),
            sub: self.subject.clone(),
            iat: now,
            exp: now + 3600,
        }
    }

    /// Gets a valid access token, refreshing if necessary.
    async fn get_access_token(&self) -> Result<String, AuthError> {
        // Check if we have a valid cached token
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > SystemTime::now() + Duration::from_secs(60) {
                    return Ok(token.token.clone());
                }
            }
        }

        let fresh = self.fetch_new_token().await?;
        let lifetime = fresh.expires_in.unwrap_or(3600).min(55 * 60);

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(CachedToken {
                token: fresh.access_token.clone(),
                expires_at: SystemTime::now() + Duration::from_secs(lifetime),
            });
        }

        Ok(fresh.access_token)
    }

    /// Fetches a new access token from Google.
    async fn fetch_new_token(&self) -> Result<TokenResponse, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AuthError::Token(e.to_string()))?
            .as_secs();

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| AuthError::Token(format!("Invalid private key: {}", e)))?;
        let jwt = encode(&header, &self.claims(now), &key)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Token(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::Token(format!(
                "Token exchange failed ({}): {}",
                status, text
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::Token(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for ServiceAccountProvider {
    async fn sign_in(&self) -> Result<UserAccount, AuthError> {
        self.get_access_token()
            .await
            .map_err(|e| AuthError::SignInFailed(e.to_string()))?;
        Ok(self.account())
    }

    /// Forgets the cached token and asks Google to revoke it.
    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(cached) = self.cached_token.write().await.take() else {
            return Ok(());
        };

        let response = self
            .client
            .post(&self.revoke_uri)
            .form(&[("token", cached.token.as_str())])
            .send()
            .await
            .map_err(|e| AuthError::SignOutFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::SignOutFailed(format!(
                "Token revocation failed ({})",
                response.status()
            )));
        }
        Ok(())
    }

    async fn fetch_token(&self, _account: &UserAccount) -> Result<String, AuthError> {
        self.get_access_token().await
    }
}
