//! Client State Module
//!
//! Stores owned by the application context: search, shortlist, compare set
//! and session. Each store loads its persisted record when constructed and
//! writes it back on mutation.

mod auth;
mod compare;
mod search;
mod shortlist;


pub use auth::AuthStore;
pub use compare::{CompareOutcome, CompareSet, MAX_COMPARE_ITEMS};
pub use search::{SearchOrchestrator, SearchOutcome, SearchSnapshot, SearchStatus};
pub use shortlist::{AddOutcome, ShortlistEntry, ShortlistReconciler, SyncReport, LOCAL_ID_PREFIX};
