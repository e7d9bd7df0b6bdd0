// =============================================================================
// GOOGLE DRIVE MODULE
// =============================================================================
//
// HTTP side of the letter workflow. The core layer only knows the `DriveApi`
// port; this module speaks Drive v3 REST to implement it.
//
// - `google_drive_client.rs` issues the search/create/upload/list requests.
// - `multipart.rs` builds the `multipart/related` upload body.
//
// Every call takes a bearer token; obtaining one is the job of `google_auth`.

pub mod google_drive_client;
pub mod multipart;

pub use google_drive_client::{GoogleDriveClient, DEFAULT_DRIVE_BASE_URL};
