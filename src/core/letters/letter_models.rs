use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of the Drive folder every letter is stored in.
pub const LETTERS_FOLDER_NAME: &str = "Letters";

/// File name used when a letter is uploaded without a title.
pub const UNTITLED_LETTER: &str = "Untitled Letter";

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
pub const DOCUMENT_MIME_TYPE: &str = "application/vnd.google-apps.document";

/// A letter that already lives in Drive. The id is assigned by Drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLetter {
    pub id: String,
    pub name: String,
    #[serde(rename = "createdTime")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "modifiedTime")]
    pub modified_at: DateTime<Utc>,
    #[serde(rename = "webViewLink")]
    pub view_link: String,
    #[serde(
        rename = "webContentLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub download_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriveFolder {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Metadata part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub name: String,
    pub mime_type: String,
    pub parents: Vec<String>,
}

/// Everything needed to create one Google Doc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub metadata: DocumentMetadata,
    pub body: String,
    pub body_content_type: &'static str,
}

/// How the editor's HTML is handed to Drive.
///
/// `PlainText` strips all markup, so headings, bold and lists are lost.
/// `Html` lets Drive's import keep that structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadFormat {
    #[default]
    PlainText,
    Html,
}

impl UploadFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            UploadFormat::PlainText => "text/plain",
            UploadFormat::Html => "text/html",
        }
    }
}

impl FromStr for UploadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" | "plaintext" => Ok(UploadFormat::PlainText),
            "html" => Ok(UploadFormat::Html),
            other => Err(format!("Unknown upload format '{}'", other)),
        }
    }
}
