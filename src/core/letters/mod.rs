pub mod drive_api;
pub mod letter_models;
pub mod letter_service;
pub mod plain_text;

pub use drive_api::{DriveApi, DriveError};
pub use letter_models::{
    DocumentMetadata, DriveFolder, NewDocument, SavedLetter, UploadFormat, DOCUMENT_MIME_TYPE,
    FOLDER_MIME_TYPE, LETTERS_FOLDER_NAME, UNTITLED_LETTER,
};
pub use letter_service::{LetterError, LetterService};
pub use plain_text::html_to_plain_text;
