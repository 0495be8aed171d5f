//! Shortlist Reconciler
//!
//! Saved programs live in two forms: server-confirmed entries returned by
//! the gateway, and local-only entries kept when the gateway rejects a save
//! (usually because nobody is signed in). Local-only entries are the only
//! ones persisted; they are pushed to the server by
//! [`ShortlistReconciler::sync_local_to_server`] once a session exists.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::{AddShortlistRequest, Program, ShortlistItem, ShortlistUpdate};
use crate::persist::{load_record, save_record, Storage, SHORTLIST_NAMESPACE};

/// Prefix of derived ids for local-only entries.
pub const LOCAL_ID_PREFIX: &str = "local-";

// == Shortlist Entry ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShortlistEntry {
    /// Saved on this device only
    Local {
        program: Program,
        notes: String,
        tags: Vec<String>,
        created_at: DateTime<Utc>,
    },
    /// Confirmed by the backend
    Remote(ShortlistItem),
}

impl ShortlistEntry {
    fn local(program: Program, notes: Option<String>, tags: Vec<String>) -> Self {
        ShortlistEntry::Local {
            program,
            notes: notes.unwrap_or_default(),
            tags,
            created_at: Utc::now(),
        }
    }

    /// Server id, or `local-<program id>` for local-only entries.
    pub fn id(&self) -> String {
        match self {
            ShortlistEntry::Local { program, .. } => format!("{}{}", LOCAL_ID_PREFIX, program.id),
            ShortlistEntry::Remote(item) => item.id.clone(),
        }
    }

    pub fn program(&self) -> &Program {
        match self {
            ShortlistEntry::Local { program, .. } => program,
            ShortlistEntry::Remote(item) => &item.program,
        }
    }

    pub fn notes(&self) -> &str {
        match self {
            ShortlistEntry::Local { notes, .. } => notes,
            ShortlistEntry::Remote(item) => &item.notes,
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            ShortlistEntry::Local { tags, .. } => tags,
            ShortlistEntry::Remote(item) => &item.tags,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            ShortlistEntry::Local { created_at, .. } => *created_at,
            ShortlistEntry::Remote(item) => item.created_at,
        }
    }

    /// The server-confirmed item, if any.
    pub fn as_remote(&self) -> Option<&ShortlistItem> {
        match self {
            ShortlistEntry::Remote(item) => Some(item),
            ShortlistEntry::Local { .. } => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ShortlistEntry::Local { .. })
    }

    /// True for a local entry addressed by its derived id or its program id.
    fn is_local_match(&self, item_id: &str) -> bool {
        self.is_local() && (self.id() == item_id || self.program().id == item_id)
    }
}

// == Outcomes ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Confirmed by the backend
    Saved,
    /// Backend rejected the save; kept as a local-only entry
    SavedLocally,
    AlreadyPresent,
}

/// Result of one [`ShortlistReconciler::sync_local_to_server`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedShortlist {
    #[serde(default)]
    items: Vec<ShortlistEntry>,
}

// == Shortlist Reconciler ==
pub struct ShortlistReconciler {
    gateway: Arc<dyn Gateway>,
    storage: Arc<dyn Storage>,
    entries: Vec<ShortlistEntry>,
    error: Option<String>,
}

impl ShortlistReconciler {
    /// Creates the reconciler with the persisted local-only entries.
    pub fn new(gateway: Arc<dyn Gateway>, storage: Arc<dyn Storage>) -> Self {
        let persisted: PersistedShortlist =
            load_record(storage.as_ref(), SHORTLIST_NAMESPACE).unwrap_or_default();
        let entries: Vec<ShortlistEntry> = persisted
            .items
            .into_iter()
            .filter(ShortlistEntry::is_local)
            .collect();
        if !entries.is_empty() {
            info!("Restored {} local shortlist entries", entries.len());
        }

        Self {
            gateway,
            storage,
            entries,
            error: None,
        }
    }

    // == Load ==
    /// Replaces server-confirmed entries with the backend's list, keeping
    /// local-only entries for programs the backend does not have.
    ///
    /// No session is not an error: local entries are kept as they are.
    pub async fn load_shortlist(&mut self) -> Result<()> {
        match self.gateway.get_shortlist().await {
            Ok(items) => {
                let local: Vec<ShortlistEntry> = self
                    .entries
                    .drain(..)
                    .filter(|entry| {
                        entry.is_local()
                            && !items.iter().any(|i| i.program.id == entry.program().id)
                    })
                    .collect();
                self.entries = items.into_iter().map(ShortlistEntry::Remote).collect();
                self.entries.extend(local);
                self.error = None;
                self.persist();
                Ok(())
            }
            Err(e) if e.is_authentication() => {
                debug!("No session, showing local shortlist only");
                self.forget_remote();
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load shortlist: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // == Add ==
    /// Saves a program, falling back to a local-only entry when the backend
    /// rejects the save.
    pub async fn add(
        &mut self,
        program: Program,
        notes: Option<String>,
        tags: Vec<String>,
    ) -> AddOutcome {
        if self.is_program_in_shortlist(&program.id) {
            return AddOutcome::AlreadyPresent;
        }

        let request = AddShortlistRequest {
            program_id: program.id.clone(),
            notes: notes.clone(),
            tags: tags.clone(),
        };

        match self.gateway.add_to_shortlist(&request).await {
            Ok(item) => {
                self.entries.push(ShortlistEntry::Remote(item));
                AddOutcome::Saved
            }
            Err(e) => {
                if e.is_authentication() {
                    debug!("Not signed in, saving program {} locally", program.id);
                } else {
                    warn!("Failed to save program {} remotely: {}", program.id, e);
                }
                self.entries.push(ShortlistEntry::local(program, notes, tags));
                self.persist();
                AddOutcome::SavedLocally
            }
        }
    }

    // == Remove ==
    /// Removes an entry by item id.
    ///
    /// Local-only entries are removed without contacting the backend. When
    /// the backend rejects a delete, `item_id` is matched against local
    /// entries by derived id or program id instead.
    pub async fn remove(&mut self, item_id: &str) -> Result<()> {
        if self.remove_local(item_id) {
            return Ok(());
        }

        match self.gateway.remove_from_shortlist(item_id).await {
            Ok(()) => {
                self.entries.retain(|entry| entry.id() != item_id);
                Ok(())
            }
            Err(e) => {
                if self.remove_local_by_program(item_id) {
                    debug!("Remote delete failed, removed local entry for {}", item_id);
                    return Ok(());
                }
                warn!("Failed to remove shortlist item {}: {}", item_id, e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // == Update ==
    /// Edits notes/tags, with the same local fallback as [`Self::remove`].
    pub async fn update(&mut self, item_id: &str, update: ShortlistUpdate) -> Result<()> {
        if self.update_local(item_id, &update, false) {
            return Ok(());
        }

        match self.gateway.update_shortlist_item(item_id, &update).await {
            Ok(item) => {
                match self.entries.iter_mut().find(|entry| entry.id() == item.id) {
                    Some(entry) => *entry = ShortlistEntry::Remote(item),
                    None => self.entries.push(ShortlistEntry::Remote(item)),
                }
                Ok(())
            }
            Err(e) => {
                if self.update_local(item_id, &update, true) {
                    debug!("Remote update failed, updated local entry for {}", item_id);
                    return Ok(());
                }
                warn!("Failed to update shortlist item {}: {}", item_id, e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // == Sync ==
    /// Pushes every local-only entry to the backend.
    ///
    /// Each confirmed entry replaces its local counterpart in place; entries
    /// that fail stay local, so the pass can be repeated.
    pub async fn sync_local_to_server(&mut self) -> SyncReport {
        let mut report = SyncReport::default();
        let mut index = 0;

        while index < self.entries.len() {
            let request = match &self.entries[index] {
                ShortlistEntry::Local {
                    program,
                    notes,
                    tags,
                    ..
                } => AddShortlistRequest {
                    program_id: program.id.clone(),
                    notes: Some(notes.clone()).filter(|n| !n.is_empty()),
                    tags: tags.clone(),
                },
                ShortlistEntry::Remote(_) => {
                    index += 1;
                    continue;
                }
            };

            match self.gateway.add_to_shortlist(&request).await {
                Ok(item) => {
                    report.synced += 1;
                    if self.entries.iter().any(|entry| entry.id() == item.id) {
                        self.entries.remove(index);
                        continue;
                    }
                    self.entries[index] = ShortlistEntry::Remote(item);
                }
                Err(e) => {
                    report.failed += 1;
                    debug!("Could not sync program {}: {}", request.program_id, e);
                }
            }
            index += 1;
        }

        if report.synced > 0 || report.failed > 0 {
            info!(
                "Shortlist sync: {} synced, {} still local",
                report.synced, report.failed
            );
        }
        self.persist();
        report
    }

    /// Drops server-confirmed entries, e.g. on sign-out.
    pub fn forget_remote(&mut self) {
        self.entries.retain(ShortlistEntry::is_local);
    }

    // == Queries ==
    pub fn entries(&self) -> &[ShortlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn local_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_local()).count()
    }

    pub fn is_program_in_shortlist(&self, program_id: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.program().id == program_id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // == Local Paths ==
    fn remove_local(&mut self, item_id: &str) -> bool {
        if !item_id.starts_with(LOCAL_ID_PREFIX) {
            return false;
        }
        let before = self.entries.len();
        self.entries
            .retain(|entry| !(entry.is_local() && entry.id() == item_id));
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    fn remove_local_by_program(&mut self, item_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.is_local_match(item_id));
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Applies `update` to matching local entries. Without `by_program`
    /// only derived ids match.
    fn update_local(&mut self, item_id: &str, update: &ShortlistUpdate, by_program: bool) -> bool {
        let mut updated = false;
        for entry in self.entries.iter_mut() {
            let matched = if by_program {
                entry.is_local_match(item_id)
            } else {
                entry.is_local() && entry.id() == item_id
            };
            if !matched {
                continue;
            }
            if let ShortlistEntry::Local { notes, tags, .. } = entry {
                update.apply_to(notes, tags);
                updated = true;
            }
        }
        if updated {
            self.persist();
        }
        updated
    }

    fn persist(&self) {
        let record = PersistedShortlist {
            items: self
                .entries
                .iter()
                .filter(|entry| entry.is_local())
                .cloned()
                .collect(),
        };
        if let Err(e) = save_record(self.storage.as_ref(), SHORTLIST_NAMESPACE, &record) {
            warn!("Failed to persist shortlist: {}", e);
        }
    }
}
