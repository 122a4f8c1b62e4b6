//! Shared application state handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::forms::{AssetStore, FormService, FsAssetStore};

#[derive(Clone)]
pub struct AppState {
    pub forms: Arc<FormService>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        log::info!("Loading form assets from {}", config.asset_dir.display());
        let store = Arc::new(FsAssetStore::new(&config.asset_dir));
        Self::with_store(store, config.asset_cache_ttl)
    }

    pub fn with_store(store: Arc<dyn AssetStore>, cache_ttl: Duration) -> Self {
        Self {
            forms: Arc::new(FormService::new(store, cache_ttl)),
        }
    }
}
