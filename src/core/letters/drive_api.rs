use super::letter_models::{DriveFolder, NewDocument, SavedLetter};
use async_trait::async_trait;
use thiserror::Error;

/// Failures from a single call to the Drive service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriveError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Drive returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Remote { status: u16, message: Option<String> },
    #[error("Unexpected Drive response: {0}")]
    Decode(String),
}

impl DriveError {
    /// The `error.message` Drive sent back, if the failure came with one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            DriveError::Remote { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// The Drive operations the letter workflow needs.
///
/// Each call takes the bearer token explicitly so nothing about the signed-in
/// user is held by the client.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Non-trashed folders named exactly `name`, in Drive's order.
    async fn find_folders(&self, token: &str, name: &str) -> Result<Vec<DriveFolder>, DriveError>;

    async fn create_folder(&self, token: &str, name: &str) -> Result<DriveFolder, DriveError>;

    /// Uploads one document and returns the metadata Drive echoes back.
    async fn create_document(
        &self,
        token: &str,
        document: &NewDocument,
    ) -> Result<SavedLetter, DriveError>;

    /// Every non-trashed file whose parent is `folder_id`.
    async fn list_children(
        &self,
        token: &str,
        folder_id: &str,
    ) -> Result<Vec<SavedLetter>, DriveError>;
}
