//! Gateway Module
//!
//! The contract for reading the program catalog and mutating user data, with
//! two interchangeable implementations: [`HttpGateway`] talks to the REST
//! backend, [`MockGateway`] serves an in-memory catalog.
//!
//! Implementations hold at most one bearer credential at a time, applied to
//! every call until cleared.

pub mod catalog;
pub mod fixtures;
mod http;
mod mock;


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::models::{
    AddShortlistRequest, AiMessage, AuthResponse, LeadForm, Program, ProfileUpdate,
    RegisterRequest, SearchFilters, SearchParams, SearchResult, ShortlistItem, ShortlistUpdate,
    UniversitySummary, User, UserProfile,
};

pub use http::HttpGateway;
pub use mock::{MockBackend, MockGateway};

// == Gateway Trait ==
/// Catalog, account and shortlist operations.
///
/// Every failure is returned as a [`crate::error::DiscoveryError`]; shortlist
/// and profile calls fail with `Authentication` when no session is active.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// One page of programs matching `params`.
    async fn search_programs(&self, params: &SearchParams) -> Result<SearchResult>;

    async fn get_program(&self, id: &str) -> Result<Program>;

    /// Programs listed in the target's related-program ids; empty if none.
    async fn get_similar_programs(&self, program_id: &str) -> Result<Vec<Program>>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse>;

    async fn get_current_user(&self) -> Result<User>;

    async fn update_user_profile(&self, update: &ProfileUpdate) -> Result<UserProfile>;

    async fn get_shortlist(&self) -> Result<Vec<ShortlistItem>>;

    async fn add_to_shortlist(&self, request: &AddShortlistRequest) -> Result<ShortlistItem>;

    async fn remove_from_shortlist(&self, item_id: &str) -> Result<()>;

    async fn update_shortlist_item(
        &self,
        item_id: &str,
        update: &ShortlistUpdate,
    ) -> Result<ShortlistItem>;

    /// Best-effort suggestions; no ranking contract.
    async fn get_recommendations(
        &self,
        profile: Option<&UserProfile>,
        filters: Option<&SearchFilters>,
    ) -> Result<Vec<Program>>;

    async fn send_ai_message(
        &self,
        message: &str,
        context: Option<&serde_json::Value>,
    ) -> Result<AiMessage>;

    async fn submit_lead(&self, lead: &LeadForm) -> Result<()>;

    async fn get_countries(&self) -> Result<Vec<String>>;

    async fn get_disciplines(&self) -> Result<Vec<String>>;

    async fn get_universities(&self, country: Option<&str>) -> Result<Vec<UniversitySummary>>;

    /// Replaces the active bearer credential.
    async fn set_auth_token(&self, token: &str);

    async fn clear_auth_token(&self);
}

// == Gateway Selection ==
/// Builds the gateway selected by `config.use_mock_api`.
pub fn build_gateway(config: &Config) -> Result<Arc<dyn Gateway>> {
    if config.use_mock_api {
        info!("Using in-memory catalog gateway");
        let backend =
            MockBackend::seeded().with_latency(Duration::from_millis(config.mock_latency_ms));
        Ok(Arc::new(MockGateway::new(backend)))
    } else {
        info!("Using REST gateway at {}", config.api_base_url);
        let gateway = HttpGateway::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout),
        )?;
        Ok(Arc::new(gateway))
    }
}
