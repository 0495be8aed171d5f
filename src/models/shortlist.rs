//! Server-confirmed shortlist items as exchanged with the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::program::Program;

/// A saved program, confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlistItem {
    pub id: String,
    pub program: Program,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Notes/tags edit; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShortlistUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ShortlistUpdate {
    /// Applies the update to a notes/tags pair.
    pub fn apply_to(&self, notes: &mut String, tags: &mut Vec<String>) {
        if let Some(new_notes) = &self.notes {
            *notes = new_notes.clone();
        }
        if let Some(new_tags) = &self.tags {
            *tags = new_tags.clone();
        }
    }
}
