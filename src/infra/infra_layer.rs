// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "drafts/mod.rs"]
pub mod drafts;

#[path = "google_drive/mod.rs"]
pub mod google_drive;

#[path = "google_auth/mod.rs"]
pub mod google_auth;
