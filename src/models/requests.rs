//! Request bodies sent to the backend.

use serde::{Deserialize, Serialize};

use crate::models::search::SearchFilters;
use crate::models::user::UserProfile;

/// Body of `POST /shortlist`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddShortlistRequest {
    pub program_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AddShortlistRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.program_id.trim().is_empty() {
            return Some("Program id cannot be empty".to_string());
        }
        None
    }
}

/// Body of `POST /recommendations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_filters: Option<SearchFilters>,
}

/// Body of `POST /ai/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl ChatRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.message.trim().is_empty() {
            return Some("Message cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_request_deserialize_without_optionals() {
        let json = r#"{"program_id": "3"}"#;
        let req: AddShortlistRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.program_id, "3");
        assert!(req.notes.is_none());
        assert!(req.tags.is_empty());
    }

    #[test]
    fn test_add_request_validate() {
        let req = AddShortlistRequest {
            program_id: " ".to_string(),
            ..Default::default()
        };
        assert!(req.validate().is_some());
    }
}
