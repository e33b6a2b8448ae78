pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod routes;
pub mod validation;

use std::sync::Arc;

use auth::tokens::TokenKeys;
use config::Config;
use db::store::Store;
use gateway::fanout::Broadcaster;
use gateway::registry::ConnectionRegistry;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenKeys>,
    pub config: Arc<Config>,
    pub broadcaster: Broadcaster,
}

impl AppState {
    /// Build state around `store` with an empty connection registry.
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let tokens = TokenKeys::from_secret(&config.secret_key, config.access_token_ttl_minutes);
        Self {
            store,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
            broadcaster: Broadcaster::new(Arc::new(ConnectionRegistry::new())),
        }
    }
}
