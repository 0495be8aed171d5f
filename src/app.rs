//! Application Context
//!
//! Owns the gateway, the storage backend and every client store. Built once
//! at startup; all stores load their persisted records eagerly.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::gateway::{build_gateway, Gateway};
use crate::models::Program;
use crate::persist::{FileStorage, Storage};
use crate::state::{AuthStore, CompareSet, SearchOrchestrator, ShortlistReconciler, SyncReport};

// == Discovery ==
pub struct Discovery {
    gateway: Arc<dyn Gateway>,
    auth: AuthStore,
    search: SearchOrchestrator,
    shortlist: ShortlistReconciler,
    compare: CompareSet,
}

impl Discovery {
    // == Bootstrap ==
    /// Builds the context from configuration: file storage under
    /// `storage_dir` and the gateway selected by `use_mock_api`.
    pub async fn bootstrap(config: &Config) -> Result<Self> {
        let storage = FileStorage::open(&config.storage_dir)?;
        info!("Client storage at {}", storage.root().display());
        let gateway = build_gateway(config)?;
        Ok(Self::with_parts(config, gateway, Arc::new(storage)).await)
    }

    /// Builds the context over an injected gateway and storage.
    pub async fn with_parts(
        config: &Config,
        gateway: Arc<dyn Gateway>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let auth = AuthStore::load(gateway.clone(), storage.clone()).await;
        let search = SearchOrchestrator::from_config(gateway.clone(), storage.clone(), config);
        let compare = CompareSet::new(storage.clone());
        let mut shortlist = ShortlistReconciler::new(gateway.clone(), storage);

        if auth.is_authenticated() {
            if let Err(e) = shortlist.load_shortlist().await {
                warn!("Shortlist not loaded at startup: {}", e);
            }
        }

        Self {
            gateway,
            auth,
            search,
            shortlist,
            compare,
        }
    }

    // == Session ==
    /// Logs in, pushes local-only shortlist entries to the server, then
    /// reloads the shortlist.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<SyncReport> {
        self.auth.login(email, password).await?;
        let report = self.shortlist.sync_local_to_server().await;
        if let Err(e) = self.shortlist.load_shortlist().await {
            warn!("Shortlist reload after sign-in failed: {}", e);
        }
        Ok(report)
    }

    /// Logs out and drops server-confirmed shortlist entries.
    pub async fn sign_out(&mut self) {
        self.auth.logout().await;
        self.shortlist.forget_remote();
    }

    // == Recommendations ==
    /// Suggestions for the signed-in profile and the current search filters.
    pub async fn recommendations(&self) -> Result<Vec<Program>> {
        let filters = self.search.snapshot().await.filters;
        let profile = self.auth.user().and_then(|user| user.profile.as_ref());
        self.gateway
            .get_recommendations(profile, Some(&filters))
            .await
    }

    // == Accessors ==
    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    pub fn search(&self) -> &SearchOrchestrator {
        &self.search
    }

    pub fn shortlist(&self) -> &ShortlistReconciler {
        &self.shortlist
    }

    pub fn shortlist_mut(&mut self) -> &mut ShortlistReconciler {
        &mut self.shortlist
    }

    pub fn compare(&self) -> &CompareSet {
        &self.compare
    }

    pub fn compare_mut(&mut self) -> &mut CompareSet {
        &mut self.compare
    }
}
