// CLI layer - argument parsing, commands and output formatting.
// Commands stay thin: call a core service, print the result.

#[path = "args.rs"]
pub mod args;

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "formatting.rs"]
pub mod formatting;

use crate::core::auth::{AuthSession, IdentityProvider};
use crate::core::drafts::{DraftService, KeyValueStore};
use crate::core::letters::LetterService;
use crate::infra::google_drive::GoogleDriveClient;
use std::sync::Arc;
use std::time::Duration;

pub type Error = anyhow::Error;

pub type Session = AuthSession<Box<dyn IdentityProvider>>;
pub type Drafts = DraftService<Box<dyn KeyValueStore>>;
pub type Letters = LetterService<GoogleDriveClient, Arc<Session>>;

/// Services shared by every command.
pub struct Data {
    pub session: Arc<Session>,
    pub drafts: Arc<Drafts>,
    pub letters: Arc<Letters>,
    pub autosave_interval: Duration,
}
