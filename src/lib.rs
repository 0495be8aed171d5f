//! Program Discovery - search, shortlist and compare university programs
//!
//! A gateway over the catalog backend (REST or in-memory), a TTL search cache,
//! durable client stores and a development backend serving the in-memory
//! catalog over HTTP.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod persist;
pub mod state;

pub use api::{create_router, AppState};
pub use app::Discovery;
pub use config::Config;
pub use error::{DiscoveryError, Result};
pub use gateway::{build_gateway, Gateway, HttpGateway, MockBackend, MockGateway};
