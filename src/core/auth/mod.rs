pub mod auth_service;

pub use auth_service::{AuthError, AuthSession, IdentityProvider, TokenSource, UserAccount};
