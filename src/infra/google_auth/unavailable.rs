use crate::core::auth::{AuthError, IdentityProvider, UserAccount};
use async_trait::async_trait;

/// Stands in for an identity that could not be set up (bad key path,
/// malformed key). Local commands keep working; signing in reports why
/// Google Drive is out of reach.
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for UnavailableProvider {
    async fn sign_in(&self) -> Result<UserAccount, AuthError> {
        Err(AuthError::SignInFailed(self.reason.clone()))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn fetch_token(&self, _account: &UserAccount) -> Result<String, AuthError> {
        Err(AuthError::Token(self.reason.clone()))
    }
}
