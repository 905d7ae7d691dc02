//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Holds the engine's stores and the check
//! orchestrator; everything is `Arc`-backed, so cloning the state is
//! cheap and all clones share the same data.

use std::sync::Arc;

use mensa_catalog::DishCatalog;
use mensa_engine::{CheckOrchestrator, CheckStore, MenuStore, RuleStore};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl AppConfig {
    /// Build configuration from the environment (`PORT`, default 8080).
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        Self { port }
    }
}

/// Shared application state accessible to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub menus: Arc<MenuStore>,
    pub rules: Arc<RuleStore>,
    pub catalog: Arc<DishCatalog>,
    pub checks: Arc<CheckStore>,
    pub orchestrator: Arc<CheckOrchestrator>,
    pub config: AppConfig,
}

impl AppState {
    /// Create application state with empty stores and default config.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create application state with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let menus = Arc::new(MenuStore::new());
        let rules = Arc::new(RuleStore::new());
        let catalog = Arc::new(DishCatalog::new());
        let checks = Arc::new(CheckStore::new());
        let orchestrator = Arc::new(CheckOrchestrator::new(
            Arc::clone(&menus),
            Arc::clone(&rules),
            Arc::clone(&catalog),
            Arc::clone(&checks),
        ));
        Self {
            menus,
            rules,
            catalog,
            checks,
            orchestrator,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
