use crate::core::auth::{AuthError, IdentityProvider, UserAccount};
use async_trait::async_trait;

/// Identity backed by an access token obtained elsewhere (e.g. `gcloud auth
/// print-access-token` or an OAuth playground run with the drive.file scope).
pub struct EnvTokenProvider {
    token: Option<String>,
    email: Option<String>,
}

impl EnvTokenProvider {
    pub fn new(token: Option<String>, email: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            email,
        }
    }

    /// Reads `GOOGLE_ACCESS_TOKEN` and `LETTER_WRITER_USER`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("GOOGLE_ACCESS_TOKEN").ok(),
            std::env::var("LETTER_WRITER_USER").ok(),
        )
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl IdentityProvider for EnvTokenProvider {
    async fn sign_in(&self) -> Result<UserAccount, AuthError> {
        if self.token.is_none() {
            return Err(AuthError::SignInFailed(
                "GOOGLE_ACCESS_TOKEN is not set".to_string(),
            ));
        }

        Ok(UserAccount {
            email: self.email.clone().unwrap_or_else(|| "me".to_string()),
            display_name: None,
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // The token is owned by whoever issued it; nothing to revoke here.
        Ok(())
    }

    async fn fetch_token(&self, _account: &UserAccount) -> Result<String, AuthError> {
        self.token
            .clone()
            .ok_or_else(|| AuthError::Token("GOOGLE_ACCESS_TOKEN is not set".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{AuthSession, TokenSource};

    #[tokio::test]
    async fn test_missing_token_cannot_sign_in() {
        let session = AuthSession::new(EnvTokenProvider::new(None, None));
        assert!(matches!(
            session.sign_in().await,
            Err(AuthError::SignInFailed(_))
        ));
        assert_eq!(session.access_token().await, None);
    }

    #[tokio::test]
    async fn test_blank_token_counts_as_missing() {
        let provider = EnvTokenProvider::new(Some("  ".to_string()), None);
        assert!(!provider.has_token());
    }

    #[tokio::test]
    async fn test_token_handed_out_after_sign_in() {
        let provider = EnvTokenProvider::new(
            Some("ya29.token".to_string()),
            Some("ada@example.com".to_string()),
        );
        let session = AuthSession::new(provider);
        assert_eq!(session.sign_in().await.unwrap().email, "ada@example.com");
        assert_eq!(session.access_token().await.as_deref(), Some("ya29.token"));

        session.sign_out().await.unwrap();
        assert_eq!(session.access_token().await, None);
    }
}
