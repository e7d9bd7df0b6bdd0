// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "auth/mod.rs"]
pub mod auth;

#[path = "drafts/mod.rs"]
pub mod drafts;

#[path = "letters/mod.rs"]
pub mod letters;
