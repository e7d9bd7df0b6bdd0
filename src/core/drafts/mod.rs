pub mod draft_models;
pub mod draft_service;
pub mod draft_store;

pub use draft_models::{Draft, DRAFT_KEY};
pub use draft_service::{spawn_autosave, DraftError, DraftService};
pub use draft_store::{KeyValueStore, StoreError};
