//! Auth Store
//!
//! The signed-in user and their bearer token. The pair is persisted under
//! `auth-storage` and the token is handed back to the gateway on startup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DiscoveryError, Result};
use crate::gateway::Gateway;
use crate::models::{AuthResponse, ProfileUpdate, RegisterRequest, User, UserProfile};
use crate::persist::{load_record, save_record, Storage, AUTH_NAMESPACE};

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedAuth {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    token: Option<String>,
}

// == Auth Store ==
pub struct AuthStore {
    gateway: Arc<dyn Gateway>,
    storage: Arc<dyn Storage>,
    user: Option<User>,
    token: Option<String>,
    error: Option<String>,
}

impl AuthStore {
    /// Restores the persisted session and applies its token to the gateway.
    pub async fn load(gateway: Arc<dyn Gateway>, storage: Arc<dyn Storage>) -> Self {
        let persisted: PersistedAuth =
            load_record(storage.as_ref(), AUTH_NAMESPACE).unwrap_or_default();

        // A user without a token (or the reverse) is not a session
        let (user, token) = match (persisted.user, persisted.token) {
            (Some(user), Some(token)) => {
                gateway.set_auth_token(&token).await;
                info!("Restored session for {}", user.email);
                (Some(user), Some(token))
            }
            _ => (None, None),
        };

        Self {
            gateway,
            storage,
            user,
            token,
            error: None,
        }
    }

    // == Login ==
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        self.error = None;
        let result = self.gateway.login(email, password).await;
        self.accept(result).await
    }

    // == Register ==
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<User> {
        self.error = None;
        if let Some(message) = request.validate() {
            self.error = Some(message.clone());
            return Err(DiscoveryError::Validation(message));
        }
        let result = self.gateway.register(request).await;
        self.accept(result).await
    }

    async fn accept(&mut self, result: Result<AuthResponse>) -> Result<User> {
        match result {
            Ok(AuthResponse { user, token }) => {
                self.gateway.set_auth_token(&token).await;
                info!("Signed in as {}", user.email);
                self.user = Some(user.clone());
                self.token = Some(token);
                self.persist();
                Ok(user)
            }
            Err(e) => {
                warn!("Sign-in failed: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // == Logout ==
    /// Forgets the session locally and on the gateway.
    pub async fn logout(&mut self) {
        self.gateway.clear_auth_token().await;
        if let Some(user) = self.user.take() {
            info!("Signed out {}", user.email);
        }
        self.token = None;
        self.error = None;
        if let Err(e) = self.storage.remove(AUTH_NAMESPACE) {
            warn!("Failed to clear persisted session: {}", e);
        }
    }

    // == Profile ==
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<UserProfile> {
        match self.gateway.update_user_profile(update).await {
            Ok(profile) => {
                if let Some(user) = self.user.as_mut() {
                    user.profile = Some(profile.clone());
                }
                self.persist();
                Ok(profile)
            }
            Err(e) => {
                warn!("Profile update failed: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-reads the user from the backend. A rejected session signs out.
    pub async fn refresh_user(&mut self) -> Result<User> {
        match self.gateway.get_current_user().await {
            Ok(user) => {
                self.user = Some(user.clone());
                self.persist();
                Ok(user)
            }
            Err(e) => {
                if e.is_authentication() {
                    self.logout().await;
                }
                Err(e)
            }
        }
    }

    // == Queries ==
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn persist(&self) {
        let record = PersistedAuth {
            user: self.user.clone(),
            token: self.token.clone(),
        };
        if let Err(e) = save_record(self.storage.as_ref(), AUTH_NAMESPACE, &record) {
            warn!("Failed to persist session: {}", e);
        }
    }
}
