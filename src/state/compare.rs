//! Compare Set
//!
//! Up to four programs shown side by side. Purely local: every mutation is
//! written to the `compare-storage` record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{CompareItem, Program};
use crate::persist::{load_record, save_record, Storage, COMPARE_NAMESPACE};

/// Maximum number of programs in the compare set.
pub const MAX_COMPARE_ITEMS: usize = 4;

// == Outcome ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutcome {
    Added,
    AlreadyPresent,
    /// The set already holds [`MAX_COMPARE_ITEMS`] programs
    AtCapacity,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedCompare {
    #[serde(default)]
    items: Vec<CompareItem>,
    #[serde(default)]
    is_open: bool,
}

// == Compare Set ==
pub struct CompareSet {
    storage: Arc<dyn Storage>,
    items: Vec<CompareItem>,
    is_open: bool,
}

impl CompareSet {
    /// Loads the persisted set, dropping duplicates and anything past capacity.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let persisted: PersistedCompare =
            load_record(storage.as_ref(), COMPARE_NAMESPACE).unwrap_or_default();

        let mut items: Vec<CompareItem> = Vec::with_capacity(MAX_COMPARE_ITEMS);
        for item in persisted.items {
            let duplicate = items.iter().any(|i| i.program_id() == item.program_id());
            if items.len() < MAX_COMPARE_ITEMS && !duplicate {
                items.push(item);
            }
        }
        let is_open = persisted.is_open && !items.is_empty();

        Self {
            storage,
            items,
            is_open,
        }
    }

    // == Add ==
    /// Adds a program stamped with the current time and opens the drawer.
    pub fn add(&mut self, program: Program) -> CompareOutcome {
        if self.contains(&program.id) {
            return CompareOutcome::AlreadyPresent;
        }
        if !self.can_add_more() {
            debug!("Compare set full, rejecting {}", program.id);
            return CompareOutcome::AtCapacity;
        }

        self.items.push(CompareItem::new(program));
        self.is_open = true;
        self.persist();
        CompareOutcome::Added
    }

    // == Remove ==
    /// Removes a program by id; the drawer closes once the set is empty.
    ///
    /// Returns true if something was removed.
    pub fn remove(&mut self, program_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.program_id() != program_id);
        let removed = self.items.len() != before;

        if self.items.is_empty() {
            self.is_open = false;
        }
        if removed {
            self.persist();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.is_open = false;
        self.persist();
    }

    // == Drawer ==
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
        self.persist();
    }

    pub fn open(&mut self) {
        self.is_open = true;
        self.persist();
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.persist();
    }

    // == Queries ==
    pub fn is_program_in_compare(&self, program_id: &str) -> bool {
        self.contains(program_id)
    }

    pub fn can_add_more(&self) -> bool {
        self.items.len() < MAX_COMPARE_ITEMS
    }

    pub fn items(&self) -> &[CompareItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    fn contains(&self, program_id: &str) -> bool {
        self.items.iter().any(|i| i.program_id() == program_id)
    }

    fn persist(&self) {
        let record = PersistedCompare {
            items: self.items.clone(),
            is_open: self.is_open,
        };
        if let Err(e) = save_record(self.storage.as_ref(), COMPARE_NAMESPACE, &record) {
            warn!("Failed to persist compare set: {}", e);
        }
    }
}
