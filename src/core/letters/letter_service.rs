// Letter service - the Drive side of the letter workflow.
//
// This service handles:
// - Finding (or creating) the folder all letters live in
// - Uploading a letter as a Google Doc into that folder
// - Listing the letters already uploaded
//
// The folder is resolved fresh on every write/list; nothing is cached.
// No HTTP here - the Drive calls go through the `DriveApi` port.

use super::drive_api::{DriveApi, DriveError};
use super::letter_models::{
    DocumentMetadata, NewDocument, SavedLetter, UploadFormat, DOCUMENT_MIME_TYPE,
    LETTERS_FOLDER_NAME, UNTITLED_LETTER,
};
use super::plain_text::html_to_plain_text;
use crate::core::auth::TokenSource;
use crate::core::drafts::Draft;
use thiserror::Error;

const SAVE_FAILED: &str = "Failed to save letter";
const LIST_FAILED: &str = "Failed to list letters";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum LetterError {
    #[error("Not signed in: no access token available")]
    NotSignedIn,

    #[error("Please add a title to your letter")]
    TitleRequired,

    #[error("Your letter is empty. Please write something before saving.")]
    ContentRequired,

    #[error("Failed to access or create {folder} folder in Google Drive")]
    FolderAccess {
        folder: String,
        #[source]
        source: DriveError,
    },

    #[error("{0}")]
    Save(String),

    #[error("{0}")]
    List(String),
}

impl LetterError {
    fn save(err: DriveError) -> Self {
        tracing::error!("Error saving letter to Google Drive: {}", err);
        LetterError::Save(err.remote_message().unwrap_or(SAVE_FAILED).to_string())
    }

    fn list(err: DriveError) -> Self {
        tracing::error!("Error listing letters from Google Drive: {}", err);
        LetterError::List(err.remote_message().unwrap_or(LIST_FAILED).to_string())
    }
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct LetterService<C: DriveApi, T: TokenSource> {
    client: C,
    tokens: T,
    folder_name: String,
    upload_format: UploadFormat,
}

impl<C: DriveApi, T: TokenSource> LetterService<C, T> {
    pub fn new(client: C, tokens: T) -> Self {
        Self {
            client,
            tokens,
            folder_name: LETTERS_FOLDER_NAME.to_string(),
            upload_format: UploadFormat::default(),
        }
    }

    pub fn with_folder_name(mut self, name: impl Into<String>) -> Self {
        self.folder_name = name.into();
        self
    }

    pub fn with_upload_format(mut self, format: UploadFormat) -> Self {
        self.upload_format = format;
        self
    }

    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// Returns the id of the letters folder, creating it when none exists.
    ///
    /// When several folders share the name, the first one Drive returns wins.
    pub async fn resolve_folder(&self, token: &str) -> Result<String, LetterError> {
        let existing = self
            .client
            .find_folders(token, &self.folder_name)
            .await
            .map_err(|e| {
                tracing::error!("Error searching for {} folder: {}", self.folder_name, e);
                LetterError::FolderAccess {
                    folder: self.folder_name.clone(),
                    source: e,
                }
            })?;

        if let Some(folder) = existing.into_iter().next() {
            return Ok(folder.id);
        }

        let created = self
            .client
            .create_folder(token, &self.folder_name)
            .await
            .map_err(|e| {
                tracing::error!("Error creating {} folder: {}", self.folder_name, e);
                LetterError::FolderAccess {
                    folder: self.folder_name.clone(),
                    source: e,
                }
            })?;

        tracing::info!(folder_id = %created.id, "Created {} folder in Google Drive", self.folder_name);
        Ok(created.id)
    }

    /// Uploads one letter as a new Google Doc. Never overwrites: the same
    /// title saved twice gives two documents.
    pub async fn write_letter(
        &self,
        token: &str,
        title: &str,
        html: &str,
    ) -> Result<SavedLetter, LetterError> {
        let folder_id = self.resolve_folder(token).await?;

        let name = if title.is_empty() {
            UNTITLED_LETTER
        } else {
            title
        };

        let body = match self.upload_format {
            UploadFormat::PlainText => {
                let text = html_to_plain_text(html);
                if text.len() != html.len() {
                    tracing::debug!("Markup removed from letter body; formatting is not kept");
                }
                text
            }
            UploadFormat::Html => html.to_string(),
        };

        let document = NewDocument {
            metadata: DocumentMetadata {
                name: name.to_string(),
                mime_type: DOCUMENT_MIME_TYPE.to_string(),
                parents: vec![folder_id],
            },
            body,
            body_content_type: self.upload_format.content_type(),
        };

        let letter = self
            .client
            .create_document(token, &document)
            .await
            .map_err(LetterError::save)?;

        tracing::info!(letter_id = %letter.id, name = %letter.name, "Letter saved to Google Drive");
        Ok(letter)
    }

    /// All letters in the folder, in the order Drive returns them.
    pub async fn list_letters(&self, token: &str) -> Result<Vec<SavedLetter>, LetterError> {
        let folder_id = self.resolve_folder(token).await?;

        self.client
            .list_children(token, &folder_id)
            .await
            .map_err(LetterError::list)
    }

    /// Uploads the draft for the signed-in user after checking it is worth sending.
    pub async fn save_draft_to_drive(&self, draft: &Draft) -> Result<SavedLetter, LetterError> {
        if draft.title.is_empty() {
            return Err(LetterError::TitleRequired);
        }
        if draft.content.trim().is_empty() {
            return Err(LetterError::ContentRequired);
        }

        let token = self.require_token().await?;
        self.write_letter(&token, &draft.title, &draft.content).await
    }

    /// Letters for the signed-in user.
    pub async fn letters(&self) -> Result<Vec<SavedLetter>, LetterError> {
        let token = self.require_token().await?;
        self.list_letters(&token).await
    }

    /// Folder id for the signed-in user.
    pub async fn folder(&self) -> Result<String, LetterError> {
        let token = self.require_token().await?;
        self.resolve_folder(&token).await
    }

    async fn require_token(&self) -> Result<String, LetterError> {
        self.tokens
            .access_token()
            .await
            .ok_or(LetterError::NotSignedIn)
    }
}
