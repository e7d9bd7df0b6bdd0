// Authentication session - the explicitly passed replacement for a global
// "current user" context.
//
// The identity provider itself is external (OAuth token, service account, ...).
// This module only tracks who is signed in and hands out bearer tokens.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Sign in failed: {0}")]
    SignInFailed(String),
    #[error("Sign out failed: {0}")]
    SignOutFailed(String),
    #[error("Failed to get access token: {0}")]
    Token(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub email: String,
    pub display_name: Option<String>,
}

/// A third-party identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<UserAccount, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
    /// A bearer token for `account` that is valid right now.
    async fn fetch_token(&self, account: &UserAccount) -> Result<String, AuthError>;
}

// Blanket implementation for Box<dyn IdentityProvider>
// so the composition root can pick a provider at runtime.
#[async_trait]
impl IdentityProvider for Box<dyn IdentityProvider> {
    async fn sign_in(&self) -> Result<UserAccount, AuthError> {
        (**self).sign_in().await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        (**self).sign_out().await
    }

    async fn fetch_token(&self, account: &UserAccount) -> Result<String, AuthError> {
        (**self).fetch_token(account).await
    }
}

/// Anything that can produce a bearer token on demand. `None` means there is
/// no signed-in user or the token could not be obtained.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Option<String>;
}

#[async_trait]
impl<T: TokenSource + ?Sized> TokenSource for std::sync::Arc<T> {
    async fn access_token(&self) -> Option<String> {
        (**self).access_token().await
    }
}

pub struct AuthSession<P: IdentityProvider> {
    provider: P,
    user: RwLock<Option<UserAccount>>,
}

impl<P: IdentityProvider> AuthSession<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            user: RwLock::new(None),
        }
    }

    pub async fn current_user(&self) -> Option<UserAccount> {
        self.user.read().await.clone()
    }

    pub async fn sign_in(&self) -> Result<UserAccount, AuthError> {
        let account = self.provider.sign_in().await?;
        tracing::info!(email = %account.email, "Signed in");
        *self.user.write().await = Some(account.clone());
        Ok(account)
    }

    /// Forgets the current user even if the provider reports a failure.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.user.write().await.take();
        if previous.is_none() {
            return Ok(());
        }

        self.provider.sign_out().await
    }
}

#[async_trait]
impl<P: IdentityProvider> TokenSource for AuthSession<P> {
    async fn access_token(&self) -> Option<String> {
        let account = self.current_user().await?;

        match self.provider.fetch_token(&account).await {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::error!("Error getting access token: {}", e);
                None
            }
        }
    }
}
