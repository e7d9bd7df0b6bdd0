// CLI commands module.
// Each feature gets its own command file.

pub mod auth;

pub mod compose;

pub mod draft;

pub mod letters;
