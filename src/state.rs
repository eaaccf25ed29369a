//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::auth::AuthService;
use crate::catalog::Catalog;
use crate::checkout::CheckoutFlow;
use crate::config::StorefrontConfig;
use crate::store::Store;

/// Cheaply cloneable handle to the catalog, the store and the flows built
/// on them. The process serves a single shopper session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    store: RwLock<Store>,
    checkout: Mutex<CheckoutFlow>,
    auth: AuthService,
}

impl AppState {
    /// Loads the catalog from `CATALOG_PATH` or falls back to the bundled one.
    pub fn from_config(config: StorefrontConfig) -> crate::Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin()?,
        };
        Ok(Self::new(config, catalog, Store::new()))
    }

    pub fn new(config: StorefrontConfig, catalog: Catalog, store: Store) -> Self {
        let auth = AuthService::new(config.auth_delay, config.admin_emails.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                store: RwLock::new(store),
                checkout: Mutex::new(CheckoutFlow::new()),
                auth,
            }),
        }
    }

    pub fn config(&self) -> &StorefrontConfig { &self.inner.config }
    pub fn catalog(&self) -> &Catalog { &self.inner.catalog }
    pub fn store(&self) -> &RwLock<Store> { &self.inner.store }
    pub fn checkout(&self) -> &Mutex<CheckoutFlow> { &self.inner.checkout }
    pub fn auth(&self) -> &AuthService { &self.inner.auth }
}
