//! Integration tests for the Jaangkhon storefront client.
//!
//! Every test runs the real client against a `wiremock` server standing in
//! for the marketplace API, so no network or backend is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jaangkhon-integration-tests
//! ```

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::MockServer;

use jaangkhon_storefront::config::StorefrontConfig;
use jaangkhon_storefront::session::{MemoryStore, SessionStore};
use jaangkhon_storefront::state::AppState;

/// Path prefix the mock API is mounted under.
pub const API_PREFIX: &str = "/api";

/// A mock API server and a client state wired to it.
pub struct TestContext {
    pub server: MockServer,
    pub store: MemoryStore,
    pub state: AppState,
}

impl TestContext {
    /// Start a mock server with an empty in-memory session.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let store = MemoryStore::new();
        let state = state_for(&server, Arc::new(store.clone()));
        Self {
            server,
            store,
            state,
        }
    }
}

/// Client state pointed at `server`, using `store` for the session.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn state_for(server: &MockServer, store: Arc<dyn SessionStore>) -> AppState {
    let config = StorefrontConfig::with_api_url(&format!("{}{API_PREFIX}", server.uri())).unwrap();
    AppState::new(config, store).unwrap()
}

/// Full mock path for an API endpoint.
#[must_use]
pub fn api_path(endpoint: &str) -> String {
    format!("{API_PREFIX}{endpoint}")
}

/// The standard `{success, message, data}` envelope.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "message": "", "data": data })
}

/// A product as the API sends it.
#[must_use]
pub fn product_json(id: i64, name: &str, category: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "price": 120.5,
        "imageUrl": null,
        "category": category,
        "stock": 4,
        "isActive": true
    })
}

/// The user record the login endpoint returns.
#[must_use]
pub fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "role": "customer"
    })
}
