//! Authentication service.
//!
//! Wraps the login and register endpoints and owns the locally persisted
//! session. A stored token is taken as proof of login without any server
//! round-trip; expiry is only discovered when the API rejects a request.

mod types;

pub use types::{AuthPayload, AuthResponse, LoginRequest, RegisterRequest, RegisterResponse};

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, instrument, warn};

use jaangkhon_core::UserSummary;

use crate::api::ApiClient;
use crate::error::Result;
use crate::session::{Session, SessionStore, keys};

use types::{LoginBody, RegisterBody};

/// Authentication service.
///
/// Cheap to clone; clones share the API client and the session store.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
}

impl AuthService {
    /// Create a new authentication service.
    ///
    /// `store` should be the same store `api` reads its token from, otherwise
    /// a login here will not authenticate later requests.
    #[must_use]
    pub fn new(api: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    /// Log in and persist the session.
    ///
    /// The token and user are stored only when the envelope reports
    /// `success: true` and carries them. The envelope is returned either way.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged (e.g. `ClientError::Status` with
    /// "Invalid credentials"), or `ClientError::Storage` if the session could
    /// not be persisted.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .api
            .post("/auth/login", &LoginBody::from(request))
            .await
            .inspect_err(|e| warn!(error = %e, "Login failed"))?;

        match (response.success, &response.data) {
            (true, Some(payload)) => {
                let user = serde_json::to_string(&payload.user)?;
                self.store.set(keys::TOKEN, &payload.token)?;
                self.store.set(keys::USER, &user)?;
                info!(user_id = %payload.user.id, "Logged in");
            }
            (true, None) => warn!("Login reported success without a session payload"),
            (false, _) => warn!(message = %response.message, "Login refused"),
        }

        Ok(response)
    }

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged.
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        self.api
            .post("/auth/register", &RegisterBody::from(request))
            .await
            .inspect_err(|e| warn!(error = %e, "Registration failed"))
    }

    /// Forget the stored session. Never fails; storage errors are logged.
    pub fn logout(&self) {
        match self.store.clear() {
            Ok(()) => info!("Logged out"),
            Err(e) => warn!(error = %e, "Failed to clear stored session"),
        }
    }

    /// The stored user, or `None` if there is none or it cannot be decoded.
    #[must_use]
    pub fn current_user(&self) -> Option<UserSummary> {
        let raw = match self.store.get(keys::USER) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read stored user");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, "Stored user record is malformed, ignoring it"))
            .ok()
    }

    /// Whether a non-empty token is stored. Purely local.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.stored_token().is_some()
    }

    /// Token and user together, if both are present and readable.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        let token = self.stored_token()?;
        let user = self.current_user()?;
        Some(Session {
            token: SecretString::from(token),
            user,
        })
    }

    fn stored_token(&self) -> Option<String> {
        self.store
            .get(keys::TOKEN)
            .inspect_err(|e| warn!(error = %e, "Failed to read stored token"))
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }
}
