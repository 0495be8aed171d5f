//! API Handlers
//!
//! HTTP request handlers for the development backend. Every handler answers
//! with an [`ApiResponse`] envelope; failures go through
//! [`DiscoveryError`]'s `IntoResponse`.

use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{DiscoveryError, Result};
use crate::gateway::MockBackend;
use crate::models::{
    AddShortlistRequest, AiMessage, ApiResponse, AuthResponse, ChatRequest, HealthResponse,
    LeadForm, LoginRequest, Program, ProfileUpdate, RecommendationRequest, RegisterRequest,
    SearchParams, SearchResult, ShortlistItem, ShortlistUpdate, UniversitySummary, User,
    UserProfile,
};

type ApiResult<T> = Result<Json<ApiResponse<T>>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Catalog, accounts and shortlists (cheap to clone)
    pub backend: MockBackend,
}

impl AppState {
    pub fn new(backend: MockBackend) -> Self {
        Self { backend }
    }

    /// Seeded backend with the configured simulated latency.
    pub fn from_config(config: &Config) -> Self {
        let backend =
            MockBackend::seeded().with_latency(Duration::from_millis(config.mock_latency_ms));
        Self::new(backend)
    }
}

/// Bearer token from the `Authorization` header, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

// == Programs ==
/// Handler for GET /programs/search
///
/// List facets arrive as repeated keys, so the raw pairs are decoded here.
pub async fn search_programs_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<SearchResult> {
    let params = SearchParams::from_query_pairs(&pairs)?;
    ok(state.backend.search(&params).await?)
}

/// Handler for GET /programs/:id
pub async fn get_program_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Program> {
    ok(state.backend.program(&id).await?)
}

/// Handler for GET /programs/:id/similar
pub async fn similar_programs_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Program>> {
    ok(state.backend.similar(&id).await?)
}

// == Auth ==
/// Handler for POST /auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    ok(state.backend.login(&req.email, &req.password).await?)
}

/// Handler for POST /auth/register
pub async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    if let Some(error_msg) = req.validate() {
        return Err(DiscoveryError::Validation(error_msg));
    }
    ok(state.backend.register(&req).await?)
}

/// Handler for GET /auth/me
pub async fn current_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<User> {
    ok(state.backend.current_user(bearer_token(&headers)).await?)
}

/// Handler for PUT /users/profile
pub async fn update_profile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<UserProfile> {
    ok(state
        .backend
        .update_profile(bearer_token(&headers), &update)
        .await?)
}

// == Shortlist ==
/// Handler for GET /shortlist
pub async fn get_shortlist_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<ShortlistItem>> {
    ok(state.backend.shortlist(bearer_token(&headers)).await?)
}

/// Handler for POST /shortlist
pub async fn add_shortlist_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AddShortlistRequest>,
) -> ApiResult<ShortlistItem> {
    if let Some(error_msg) = req.validate() {
        return Err(DiscoveryError::Validation(error_msg));
    }
    ok(state
        .backend
        .add_to_shortlist(bearer_token(&headers), &req)
        .await?)
}

/// Handler for DELETE /shortlist/:id
pub async fn remove_shortlist_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state
        .backend
        .remove_from_shortlist(bearer_token(&headers), &id)
        .await?;
    Ok(Json(ApiResponse::ok(()).with_message("Removed from shortlist")))
}

/// Handler for PUT /shortlist/:id
pub async fn update_shortlist_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<ShortlistUpdate>,
) -> ApiResult<ShortlistItem> {
    ok(state
        .backend
        .update_shortlist_item(bearer_token(&headers), &id, &update)
        .await?)
}

// == Assistance ==
/// Handler for POST /recommendations
pub async fn recommendations_handler(
    State(state): State<AppState>,
    Json(req): Json<RecommendationRequest>,
) -> ApiResult<Vec<Program>> {
    ok(state
        .backend
        .recommendations(req.user_profile.as_ref(), req.current_filters.as_ref())
        .await?)
}

/// Handler for POST /ai/chat
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<AiMessage> {
    if let Some(error_msg) = req.validate() {
        return Err(DiscoveryError::Validation(error_msg));
    }
    ok(state.backend.chat(&req.message, req.context.as_ref()).await?)
}

/// Handler for POST /leads
pub async fn submit_lead_handler(
    State(state): State<AppState>,
    Json(lead): Json<LeadForm>,
) -> ApiResult<()> {
    if let Some(error_msg) = lead.validate() {
        return Err(DiscoveryError::Validation(error_msg));
    }
    state.backend.submit_lead(&lead).await?;
    Ok(Json(ApiResponse::ok(()).with_message("Lead submitted")))
}

// == Metadata ==
/// Handler for GET /metadata/countries
pub async fn countries_handler(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    ok(state.backend.countries().await)
}

/// Handler for GET /metadata/disciplines
pub async fn disciplines_handler(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    ok(state.backend.disciplines().await)
}

#[derive(Debug, Deserialize)]
pub struct UniversityQuery {
    pub country: Option<String>,
}

/// Handler for GET /metadata/universities
pub async fn universities_handler(
    State(state): State<AppState>,
    Query(query): Query<UniversityQuery>,
) -> ApiResult<Vec<UniversitySummary>> {
    ok(state.backend.universities(query.country.as_deref()).await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
