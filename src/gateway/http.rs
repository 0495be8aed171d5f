//! REST gateway
//!
//! JSON over HTTP against the backend's `/programs`, `/auth`, `/users`,
//! `/shortlist`, `/recommendations`, `/ai`, `/leads` and `/metadata` paths.
//! Every response body is an [`ApiResponse`] envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::Gateway;
use crate::error::{DiscoveryError, Result};
use crate::models::{
    AddShortlistRequest, AiMessage, ApiResponse, AuthResponse, ChatRequest, ErrorResponse,
    LeadForm, LoginRequest, Program, ProfileUpdate, RecommendationRequest, RegisterRequest,
    SearchFilters, SearchParams, SearchResult, ShortlistItem, ShortlistUpdate, UniversitySummary,
    User, UserProfile,
};

// == Http Gateway ==
/// [`Gateway`] backed by the REST API.
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl HttpGateway {
    /// Creates a gateway rooted at `base_url` (e.g. `http://localhost:8000/api`).
    ///
    /// Timeouts are left to the transport: `timeout` bounds every request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| DiscoveryError::Validation(format!("Invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DiscoveryError::Validation(format!(
                "API base URL cannot hold a path: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiscoveryError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DiscoveryError::Internal(format!("Base URL cannot hold a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        Ok(match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let request = self.request(Method::GET, segments).await?;
        send(request).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let request = self.request(method, segments).await?.json(body);
        send(request).await
    }
}

/// Sends the request and maps transport failures and non-success statuses.
async fn checked(request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| DiscoveryError::Network(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::into_message)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status));
    warn!("API request failed with {}: {}", status, message);
    Err(error_for_status(status, message))
}

/// Sends the request and unwraps the envelope's `data`.
async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let envelope: ApiResponse<T> = checked(request)
        .await?
        .json()
        .await
        .map_err(|e| DiscoveryError::InvalidResponse(e.to_string()))?;
    Ok(envelope.data)
}

/// Sends a request whose success body carries nothing the caller needs.
async fn send_unit(request: RequestBuilder) -> Result<()> {
    checked(request).await.map(|_| ())
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn search_programs(&self, params: &SearchParams) -> Result<SearchResult> {
        params.validate()?;
        let request = self
            .request(Method::GET, &["programs", "search"])
            .await?
            .query(&params.to_query_pairs());
        send(request).await
    }

    async fn get_program(&self, id: &str) -> Result<Program> {
        self.get(&["programs", id]).await
    }

    async fn get_similar_programs(&self, program_id: &str) -> Result<Vec<Program>> {
        self.get(&["programs", program_id, "similar"]).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(Method::POST, &["auth", "login"], &body).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        self.send_json(Method::POST, &["auth", "register"], request).await
    }

    async fn get_current_user(&self) -> Result<User> {
        self.get(&["auth", "me"]).await
    }

    async fn update_user_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        self.send_json(Method::PUT, &["users", "profile"], update).await
    }

    async fn get_shortlist(&self) -> Result<Vec<ShortlistItem>> {
        self.get(&["shortlist"]).await
    }

    async fn add_to_shortlist(&self, request: &AddShortlistRequest) -> Result<ShortlistItem> {
        self.send_json(Method::POST, &["shortlist"], request).await
    }

    async fn remove_from_shortlist(&self, item_id: &str) -> Result<()> {
        let request = self
            .request(Method::DELETE, &["shortlist", item_id])
            .await?;
        send_unit(request).await
    }

    async fn update_shortlist_item(
        &self,
        item_id: &str,
        update: &ShortlistUpdate,
    ) -> Result<ShortlistItem> {
        self.send_json(Method::PUT, &["shortlist", item_id], update)
            .await
    }

    async fn get_recommendations(
        &self,
        profile: Option<&UserProfile>,
        filters: Option<&SearchFilters>,
    ) -> Result<Vec<Program>> {
        let body = RecommendationRequest {
            user_profile: profile.cloned(),
            current_filters: filters.cloned(),
        };
        self.send_json(Method::POST, &["recommendations"], &body).await
    }

    async fn send_ai_message(
        &self,
        message: &str,
        context: Option<&serde_json::Value>,
    ) -> Result<AiMessage> {
        let body = ChatRequest {
            message: message.to_string(),
            context: context.cloned(),
        };
        self.send_json(Method::POST, &["ai", "chat"], &body).await
    }

    async fn submit_lead(&self, lead: &LeadForm) -> Result<()> {
        let request = self.request(Method::POST, &["leads"]).await?.json(lead);
        send_unit(request).await
    }

    async fn get_countries(&self) -> Result<Vec<String>> {
        self.get(&["metadata", "countries"]).await
    }

    async fn get_disciplines(&self) -> Result<Vec<String>> {
        self.get(&["metadata", "disciplines"]).await
    }

    async fn get_universities(&self, country: Option<&str>) -> Result<Vec<UniversitySummary>> {
        let mut request = self
            .request(Method::GET, &["metadata", "universities"])
            .await?;
        if let Some(country) = country {
            request = request.query(&[("country", country)]);
        }
        send(request).await
    }

    async fn set_auth_token(&self, token: &str) {
        *self.token.write().await = Some(token.to_string());
    }

    async fn clear_auth_token(&self) {
        *self.token.write().await = None;
    }
}
