// Google identity providers.
// - `env_token.rs` uses an OAuth access token the user already holds.
// - `service_account.rs` signs a JWT with a service-account key and
//   exchanges it for an access token.
// - `unavailable.rs` replaces an identity whose configuration is broken.

#[path = "env_token.rs"]
pub mod env_token;

#[path = "service_account.rs"]
pub mod service_account;

#[path = "unavailable.rs"]
pub mod unavailable;

pub use env_token::EnvTokenProvider;
pub use service_account::ServiceAccountProvider;
pub use unavailable::UnavailableProvider;

/// Narrowest Drive scope that still lets us create and list our own files.
pub const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";
