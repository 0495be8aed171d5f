//! Assistant chat messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Link from an assistant answer to a program page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramReference {
    pub id: String,
    pub title: String,
    pub university: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_references: Option<Vec<ProgramReference>>,
}
