use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage key holding the single in-progress letter.
pub const DRAFT_KEY: &str = "letterWriterDraft";

/// The one local letter being written. There is no id and no history:
/// every save overwrites the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    /// HTML produced by the editor.
    pub content: String,
    #[serde(rename = "lastSaved")]
    pub last_saved_at: Option<DateTime<Utc>>,
}

impl Draft {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty() && self.last_saved_at.is_none()
    }
}
