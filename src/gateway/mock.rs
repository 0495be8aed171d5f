//! In-memory catalog backend and the gateway that wraps it.
//!
//! [`MockBackend`] owns the catalog, accounts, sessions and per-user
//! shortlists. It is shared (cheap `Clone`) between [`MockGateway`] and the
//! development REST router, which passes each request's bearer token in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{catalog, fixtures, Gateway};
use crate::error::{DiscoveryError, Result};
use crate::models::{
    AddShortlistRequest, AiMessage, AuthResponse, LeadForm, Program, ProfileUpdate,
    ProgramReference, RegisterRequest, Role, SearchFilters, SearchParams, SearchResult,
    ShortlistItem, ShortlistUpdate, University, UniversitySummary, User, UserProfile,
};

/// Programs returned by the recommendation endpoint.
const RECOMMENDATION_COUNT: usize = 3;

/// Programs referenced by every assistant reply.
const REFERENCED_PROGRAMS: usize = 2;

const ASSISTANT_REPLIES: [&str; 4] = [
    "Based on your profile, I recommend focusing on programs with strong research opportunities.",
    "Consider these programs that match your academic background and career goals.",
    "The programs I mentioned have excellent placement rates and industry connections.",
    "Would you like me to help you compare the specific requirements for these programs?",
];

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct BackendState {
    accounts: Vec<Account>,
    /// token -> user id
    sessions: HashMap<String, String>,
    /// user id -> saved items
    shortlists: HashMap<String, Vec<ShortlistItem>>,
    leads: Vec<LeadForm>,
}

// == Mock Backend ==
/// Shared in-memory catalog and account store.
#[derive(Clone)]
pub struct MockBackend {
    programs: Arc<Vec<Program>>,
    universities: Arc<Vec<University>>,
    countries: Arc<Vec<String>>,
    disciplines: Arc<Vec<String>>,
    state: Arc<RwLock<BackendState>>,
    searches_served: Arc<AtomicU64>,
    offline: Arc<AtomicBool>,
    latency: Duration,
}

impl MockBackend {
    /// Creates a backend over the given catalog with no accounts.
    pub fn new(programs: Vec<Program>, universities: Vec<University>) -> Self {
        Self {
            programs: Arc::new(programs),
            universities: Arc::new(universities),
            countries: Arc::new(fixtures::countries()),
            disciplines: Arc::new(fixtures::disciplines()),
            state: Arc::new(RwLock::new(BackendState::default())),
            searches_served: Arc::new(AtomicU64::new(0)),
            offline: Arc::new(AtomicBool::new(false)),
            latency: Duration::ZERO,
        }
    }

    /// Backend with the seed catalog, seed account and its shortlist.
    pub fn seeded() -> Self {
        let programs = fixtures::programs();
        let user = fixtures::seed_user();

        let mut state = BackendState::default();
        state
            .shortlists
            .insert(user.id.clone(), fixtures::seed_shortlist(&programs));
        state.accounts.push(Account {
            user,
            password: fixtures::SEED_PASSWORD.to_string(),
        });

        let backend = Self::new(programs, fixtures::universities());
        Self {
            state: Arc::new(RwLock::new(state)),
            ..backend
        }
    }

    /// Delays every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of search requests served so far.
    pub fn searches_served(&self) -> u64 {
        self.searches_served.load(Ordering::Relaxed)
    }

    /// Simulates an outage: while set, every fallible call fails with
    /// `Network`. Shared by all clones.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub async fn leads(&self) -> Vec<LeadForm> {
        self.state.read().await.leads.clone()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    async fn enter(&self) -> Result<()> {
        self.simulate_latency().await;
        if self.offline.load(Ordering::Relaxed) {
            return Err(DiscoveryError::Network("Backend unreachable".to_string()));
        }
        Ok(())
    }

    fn find_program(&self, id: &str) -> Result<&Program> {
        self.programs
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DiscoveryError::NotFound("Program not found".to_string()))
    }

    fn user_for(state: &BackendState, token: Option<&str>) -> Result<String> {
        let token =
            token.ok_or_else(|| DiscoveryError::Authentication("Not authenticated".to_string()))?;
        state.sessions.get(token).cloned().ok_or_else(|| {
            DiscoveryError::Authentication("Session expired or invalid".to_string())
        })
    }

    fn open_session(state: &mut BackendState, user: &User) -> String {
        let token = format!("mock-token-{}", Uuid::new_v4());
        state.sessions.insert(token.clone(), user.id.clone());
        token
    }

    // == Catalog ==
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResult> {
        self.enter().await?;
        self.searches_served.fetch_add(1, Ordering::Relaxed);
        let result = catalog::search(&self.programs, params)?;
        debug!(
            "Catalog search matched {} programs (page {}/{})",
            result.total, result.page, result.total_pages
        );
        Ok(result)
    }

    pub async fn program(&self, id: &str) -> Result<Program> {
        self.enter().await?;
        self.find_program(id).cloned()
    }

    pub async fn similar(&self, program_id: &str) -> Result<Vec<Program>> {
        self.enter().await?;
        let Ok(program) = self.find_program(program_id) else {
            return Ok(Vec::new());
        };
        let Some(related) = program.similar_programs.as_ref() else {
            return Ok(Vec::new());
        };
        Ok(self
            .programs
            .iter()
            .filter(|p| related.contains(&p.id))
            .cloned()
            .collect())
    }

    pub async fn recommendations(
        &self,
        profile: Option<&UserProfile>,
        filters: Option<&SearchFilters>,
    ) -> Result<Vec<Program>> {
        self.enter().await?;
        let mut candidates = match filters {
            Some(filters) => catalog::filter_programs(&self.programs, None, filters),
            None => self.programs.to_vec(),
        };
        if let Some(profile) = profile {
            // Preferred countries first, catalog order otherwise
            candidates.sort_by_key(|p| {
                !profile
                    .preferred_countries
                    .contains(&p.university.country)
            });
        }
        candidates.truncate(RECOMMENDATION_COUNT);
        Ok(candidates)
    }

    pub async fn chat(
        &self,
        message: &str,
        context: Option<&serde_json::Value>,
    ) -> Result<AiMessage> {
        self.enter().await?;
        debug!(
            "Assistant message received ({} chars, context: {})",
            message.len(),
            context.is_some()
        );

        let reply = ASSISTANT_REPLIES[message.chars().count() % ASSISTANT_REPLIES.len()];
        let references = self
            .programs
            .iter()
            .take(REFERENCED_PROGRAMS)
            .map(|program| ProgramReference {
                id: program.id.clone(),
                title: program.title.clone(),
                university: program.university.name.clone(),
                url: program.page_path(),
            })
            .collect();

        Ok(AiMessage {
            id: format!("msg-{}", Uuid::new_v4()),
            role: Role::Assistant,
            content: reply.to_string(),
            timestamp: Utc::now(),
            program_references: Some(references),
        })
    }

    pub async fn submit_lead(&self, lead: &LeadForm) -> Result<()> {
        self.enter().await?;
        info!("Lead submitted for {}", lead.email);
        self.state.write().await.leads.push(lead.clone());
        Ok(())
    }

    pub async fn countries(&self) -> Vec<String> {
        self.simulate_latency().await;
        self.countries.to_vec()
    }

    pub async fn disciplines(&self) -> Vec<String> {
        self.simulate_latency().await;
        self.disciplines.to_vec()
    }

    pub async fn universities(&self, country: Option<&str>) -> Vec<UniversitySummary> {
        self.simulate_latency().await;
        self.universities
            .iter()
            .filter(|u| country.map_or(true, |c| u.country == c))
            .map(UniversitySummary::from)
            .collect()
    }

    // == Accounts ==
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.enter().await?;
        let mut state = self.state.write().await;
        let user = state
            .accounts
            .iter()
            .find(|a| a.user.email == email && a.password == password)
            .map(|a| a.user.clone())
            .ok_or_else(|| DiscoveryError::Authentication("Invalid credentials".to_string()))?;

        let token = Self::open_session(&mut state, &user);
        info!("User {} logged in", user.id);
        Ok(AuthResponse { user, token })
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        self.enter().await?;
        let user = User {
            id: format!("user-{}", Uuid::new_v4()),
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            profile: None,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        state.accounts.push(Account {
            user: user.clone(),
            password: request.password.clone(),
        });
        let token = Self::open_session(&mut state, &user);
        info!("Registered user {}", user.id);
        Ok(AuthResponse { user, token })
    }

    /// Ends the session; unknown tokens are ignored.
    pub async fn logout(&self, token: &str) {
        self.state.write().await.sessions.remove(token);
    }

    pub async fn current_user(&self, token: Option<&str>) -> Result<User> {
        self.enter().await?;
        let state = self.state.read().await;
        let user_id = Self::user_for(&state, token)?;
        state
            .accounts
            .iter()
            .find(|a| a.user.id == user_id)
            .map(|a| a.user.clone())
            .ok_or_else(|| DiscoveryError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        token: Option<&str>,
        update: &ProfileUpdate,
    ) -> Result<UserProfile> {
        self.enter().await?;
        let mut state = self.state.write().await;
        let user_id = Self::user_for(&state, token)?;
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.user.id == user_id)
            .ok_or_else(|| DiscoveryError::NotFound("User not found".to_string()))?;

        let profile = account.user.profile.get_or_insert_with(UserProfile::default);
        profile.apply(update.clone());
        Ok(profile.clone())
    }

    // == Shortlist ==
    pub async fn shortlist(&self, token: Option<&str>) -> Result<Vec<ShortlistItem>> {
        self.enter().await?;
        let state = self.state.read().await;
        let user_id = Self::user_for(&state, token)?;
        Ok(state.shortlists.get(&user_id).cloned().unwrap_or_default())
    }

    /// Saves a program; saving an already-saved program returns the existing item.
    pub async fn add_to_shortlist(
        &self,
        token: Option<&str>,
        request: &AddShortlistRequest,
    ) -> Result<ShortlistItem> {
        self.enter().await?;
        let mut state = self.state.write().await;
        let user_id = Self::user_for(&state, token)?;
        let program = self.find_program(&request.program_id)?.clone();

        let items = state.shortlists.entry(user_id).or_default();
        if let Some(existing) = items.iter().find(|i| i.program.id == program.id) {
            return Ok(existing.clone());
        }

        let item = ShortlistItem {
            id: format!("shortlist-{}", Uuid::new_v4()),
            program,
            notes: request.notes.clone().unwrap_or_default(),
            tags: request.tags.clone(),
            created_at: Utc::now(),
        };
        items.push(item.clone());
        Ok(item)
    }

    pub async fn remove_from_shortlist(&self, token: Option<&str>, item_id: &str) -> Result<()> {
        self.enter().await?;
        let mut state = self.state.write().await;
        let user_id = Self::user_for(&state, token)?;
        if let Some(items) = state.shortlists.get_mut(&user_id) {
            items.retain(|i| i.id != item_id);
        }
        Ok(())
    }

    pub async fn update_shortlist_item(
        &self,
        token: Option<&str>,
        item_id: &str,
        update: &ShortlistUpdate,
    ) -> Result<ShortlistItem> {
        self.enter().await?;
        let mut state = self.state.write().await;
        let user_id = Self::user_for(&state, token)?;
        let item = state
            .shortlists
            .get_mut(&user_id)
            .and_then(|items| items.iter_mut().find(|i| i.id == item_id))
            .ok_or_else(|| DiscoveryError::NotFound("Shortlist item not found".to_string()))?;

        update.apply_to(&mut item.notes, &mut item.tags);
        Ok(item.clone())
    }
}

// == Mock Gateway ==
/// [`Gateway`] over a [`MockBackend`] with one active session token.
pub struct MockGateway {
    backend: MockBackend,
    token: RwLock<Option<String>>,
}

impl MockGateway {
    pub fn new(backend: MockBackend) -> Self {
        Self {
            backend,
            token: RwLock::new(None),
        }
    }

    /// Gateway over the seeded catalog with no latency.
    pub fn seeded() -> Self {
        Self::new(MockBackend::seeded())
    }

    pub fn backend(&self) -> &MockBackend {
        &self.backend
    }

    async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn search_programs(&self, params: &SearchParams) -> Result<SearchResult> {
        self.backend.search(params).await
    }

    async fn get_program(&self, id: &str) -> Result<Program> {
        self.backend.program(id).await
    }

    async fn get_similar_programs(&self, program_id: &str) -> Result<Vec<Program>> {
        self.backend.similar(program_id).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let response = self.backend.login(email, password).await?;
        *self.token.write().await = Some(response.token.clone());
        Ok(response)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let response = self.backend.register(request).await?;
        *self.token.write().await = Some(response.token.clone());
        Ok(response)
    }

    async fn get_current_user(&self) -> Result<User> {
        self.backend.current_user(self.token().await.as_deref()).await
    }

    async fn update_user_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        self.backend
            .update_profile(self.token().await.as_deref(), update)
            .await
    }

    async fn get_shortlist(&self) -> Result<Vec<ShortlistItem>> {
        self.backend.shortlist(self.token().await.as_deref()).await
    }

    async fn add_to_shortlist(&self, request: &AddShortlistRequest) -> Result<ShortlistItem> {
        self.backend
            .add_to_shortlist(self.token().await.as_deref(), request)
            .await
    }

    async fn remove_from_shortlist(&self, item_id: &str) -> Result<()> {
        self.backend
            .remove_from_shortlist(self.token().await.as_deref(), item_id)
            .await
    }

    async fn update_shortlist_item(
        &self,
        item_id: &str,
        update: &ShortlistUpdate,
    ) -> Result<ShortlistItem> {
        self.backend
            .update_shortlist_item(self.token().await.as_deref(), item_id, update)
            .await
    }

    async fn get_recommendations(
        &self,
        profile: Option<&UserProfile>,
        filters: Option<&SearchFilters>,
    ) -> Result<Vec<Program>> {
        self.backend.recommendations(profile, filters).await
    }

    async fn send_ai_message(
        &self,
        message: &str,
        context: Option<&serde_json::Value>,
    ) -> Result<AiMessage> {
        self.backend.chat(message, context).await
    }

    async fn submit_lead(&self, lead: &LeadForm) -> Result<()> {
        self.backend.submit_lead(lead).await
    }

    async fn get_countries(&self) -> Result<Vec<String>> {
        Ok(self.backend.countries().await)
    }

    async fn get_disciplines(&self) -> Result<Vec<String>> {
        Ok(self.backend.disciplines().await)
    }

    async fn get_universities(&self, country: Option<&str>) -> Result<Vec<UniversitySummary>> {
        Ok(self.backend.universities(country).await)
    }

    async fn set_auth_token(&self, token: &str) {
        *self.token.write().await = Some(token.to_string());
    }

    async fn clear_auth_token(&self) {
        if let Some(token) = self.token.write().await.take() {
            self.backend.logout(&token).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn logged_in() -> MockGateway {
        let gateway = MockGateway::seeded();
        gateway
            .login(fixtures::SEED_EMAIL, fixtures::SEED_PASSWORD)
            .await
            .unwrap();
        gateway
    }

    #[tokio::test]
    async fn test_get_program_not_found() {
        let gateway = MockGateway::seeded();
        assert_eq!(gateway.get_program("2").await.unwrap().id, "2");
        let err = gateway.get_program("404").await.unwrap_err();
        assert!(matches!(err, DiscoveryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_similar_programs() {
        let gateway = MockGateway::seeded();
        let similar = gateway.get_similar_programs("1").await.unwrap();
        let ids: Vec<&str> = similar.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);

        assert!(gateway.get_similar_programs("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_similar_programs_none_declared() {
        let mut programs = fixtures::programs();
        programs[0].similar_programs = None;
        let gateway = MockGateway::new(MockBackend::new(programs, fixtures::universities()));
        assert!(gateway.get_similar_programs("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let gateway = MockGateway::seeded();
        let err = gateway
            .login(fixtures::SEED_EMAIL, "wrong")
            .await
            .unwrap_err();
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn test_register_assigns_unique_ids() {
        let gateway = MockGateway::seeded();
        let request = RegisterRequest {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        };
        let first = gateway.register(&request).await.unwrap();
        let second = gateway.register(&request).await.unwrap();
        assert_ne!(first.user.id, second.user.id);
        assert_eq!(gateway.get_current_user().await.unwrap().id, second.user.id);
    }

    #[tokio::test]
    async fn test_shortlist_requires_session() {
        let gateway = MockGateway::seeded();
        assert!(gateway.get_shortlist().await.unwrap_err().is_authentication());

        let request = AddShortlistRequest {
            program_id: "1".to_string(),
            ..Default::default()
        };
        assert!(gateway
            .add_to_shortlist(&request)
            .await
            .unwrap_err()
            .is_authentication());
        assert!(gateway
            .remove_from_shortlist("shortlist-1")
            .await
            .unwrap_err()
            .is_authentication());
        assert!(gateway
            .update_shortlist_item("shortlist-1", &ShortlistUpdate::default())
            .await
            .unwrap_err()
            .is_authentication());
    }

    #[tokio::test]
    async fn test_shortlist_crud_with_session() {
        let gateway = logged_in().await;
        assert_eq!(gateway.get_shortlist().await.unwrap().len(), 2);

        let added = gateway
            .add_to_shortlist(&AddShortlistRequest {
                program_id: "2".to_string(),
                notes: Some("Oxford".to_string()),
                tags: vec!["uk".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(added.program.id, "2");
        assert_eq!(added.notes, "Oxford");

        let updated = gateway
            .update_shortlist_item(
                &added.id,
                &ShortlistUpdate {
                    notes: Some("Reach school".to_string()),
                    tags: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.notes, "Reach school");
        assert_eq!(updated.tags, vec!["uk".to_string()]);

        gateway.remove_from_shortlist(&added.id).await.unwrap();
        assert_eq!(gateway.get_shortlist().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_add_existing_program_returns_existing_item() {
        let gateway = logged_in().await;
        let item = gateway
            .add_to_shortlist(&AddShortlistRequest {
                program_id: "1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(item.id, "shortlist-1");
        assert_eq!(gateway.get_shortlist().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_auth_token_ends_session() {
        let gateway = logged_in().await;
        gateway.clear_auth_token().await;
        assert!(gateway.get_current_user().await.unwrap_err().is_authentication());
    }

    #[tokio::test]
    async fn test_update_profile_merges() {
        let gateway = logged_in().await;
        let profile = gateway
            .update_user_profile(&ProfileUpdate {
                budget_usd: Some(70000),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(profile.budget_usd, Some(70000));
        assert_eq!(profile.preferred_countries.len(), 2);
    }

    #[tokio::test]
    async fn test_recommendations_prefer_profile_countries() {
        let gateway = MockGateway::seeded();
        let profile = UserProfile {
            preferred_countries: vec!["United Kingdom".to_string()],
            ..Default::default()
        };
        let programs = gateway
            .get_recommendations(Some(&profile), None)
            .await
            .unwrap();
        assert_eq!(programs.len(), 3);
        assert_eq!(programs[0].id, "2");
    }

    #[tokio::test]
    async fn test_ai_message_is_assistant_reply() {
        let gateway = MockGateway::seeded();
        let message = gateway
            .send_ai_message("Which programs suit me?", None)
            .await
            .unwrap();
        assert_eq!(message.role, Role::Assistant);
        let references = message.program_references.unwrap();
        assert_eq!(references.len(), 2);
        assert_eq!(
            references[0].url,
            "/program/united-states/harvard-university/ms-computer-science-1"
        );
    }

    #[tokio::test]
    async fn test_universities_by_country() {
        let gateway = MockGateway::seeded();
        let all = gateway.get_universities(None).await.unwrap();
        assert_eq!(all.len(), 3);
        let uk = gateway.get_universities(Some("United Kingdom")).await.unwrap();
        assert_eq!(uk.len(), 1);
        assert_eq!(uk[0].slug, "university-of-oxford");
    }

    #[tokio::test]
    async fn test_search_counts_requests() {
        let gateway = MockGateway::seeded();
        gateway
            .search_programs(&SearchParams::default())
            .await
            .unwrap();
        gateway
            .search_programs(&SearchParams::default())
            .await
            .unwrap();
        assert_eq!(gateway.backend().searches_served(), 2);
    }

    #[tokio::test]
    async fn test_submit_lead_recorded() {
        let gateway = MockGateway::seeded();
        let lead = LeadForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            country: "United Kingdom".to_string(),
            interested_programs: vec!["2".to_string()],
            budget_range: None,
            target_intake: None,
            message: None,
        };
        gateway.submit_lead(&lead).await.unwrap();
        assert_eq!(gateway.backend().leads().await, vec![lead]);
    }

    #[tokio::test]
    async fn test_offline_backend_fails_with_network_error() {
        let gateway = MockGateway::seeded();
        gateway.backend().set_offline(true);

        let err = gateway
            .search_programs(&SearchParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Network(_)));
        assert_eq!(gateway.backend().searches_served(), 0);

        gateway.backend().set_offline(false);
        assert!(gateway.search_programs(&SearchParams::default()).await.is_ok());
    }
}
