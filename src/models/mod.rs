//! Domain models and wire DTOs
//!
//! Every shape here is serialized as JSON both on the wire and in the
//! persisted client records.

pub mod chat;
pub mod compare;
pub mod program;
pub mod requests;
pub mod responses;
pub mod search;
pub mod shortlist;
pub mod user;

// Re-export commonly used types
pub use chat::{AiMessage, ProgramReference, Role};
pub use compare::CompareItem;
pub use program::{
    DegreeLevel, EntryRequirements, LanguageRequirements, Location, Program, Ranking,
    University, UniversitySummary, UNRANKED,
};
pub use requests::{AddShortlistRequest, ChatRequest, RecommendationRequest};
pub use responses::{ApiResponse, ErrorResponse, HealthResponse};
pub use search::{
    Facet, SearchFilters, SearchParams, SearchResult, SortBy, ValueRange, DEFAULT_PAGE_SIZE,
};
pub use shortlist::{ShortlistItem, ShortlistUpdate};
pub use user::{
    AcademicBackground, AuthResponse, LeadForm, LoginRequest, ProfileUpdate, RegisterRequest,
    TestScores, User, UserProfile,
};
