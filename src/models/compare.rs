//! Programs placed side by side for comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::program::Program;

/// A program in the compare set with the time it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareItem {
    pub program: Program,
    pub added_at: DateTime<Utc>,
}

impl CompareItem {
    /// Stamps `program` with the current time.
    pub fn new(program: Program) -> Self {
        Self {
            program,
            added_at: Utc::now(),
        }
    }

    pub fn program_id(&self) -> &str {
        &self.program.id
    }
}
