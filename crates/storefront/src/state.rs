//! Client state shared across commands and views.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::services::{AuthService, CatalogService};
use crate::session::SessionStore;

/// Everything a storefront front end needs, wired to one session store.
///
/// This struct is cheaply cloneable via `Arc`. The HTTP client and the auth
/// service share the same store, so a login through [`AppState::auth`] is
/// seen by every later request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn SessionStore>,
    auth: AuthService,
    catalog: CatalogService,
}

impl AppState {
    /// Create the client state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        let api = ApiClient::new(&config, Arc::clone(&store))?;
        let auth = AuthService::new(api.clone(), Arc::clone(&store));
        let catalog = CatalogService::new(api);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
                catalog,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The session store shared by the client and the auth service.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
