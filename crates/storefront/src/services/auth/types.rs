//! Request and response bodies for the auth endpoints.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use jaangkhon_core::{Email, UserSummary};

use crate::api::ApiResponse;

/// Login form input.
#[derive(Clone)]
pub struct LoginRequest {
    pub email: Email,
    pub password: SecretString,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Register form input.
#[derive(Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: Email,
    pub password: SecretString,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Wire form of [`LoginRequest`]; the only place the password is exposed.
#[derive(Serialize)]
pub(super) struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a LoginRequest> for LoginBody<'a> {
    fn from(request: &'a LoginRequest) -> Self {
        Self {
            email: request.email.as_str(),
            password: request.password.expose_secret(),
        }
    }
}

/// Wire form of [`RegisterRequest`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
}

impl<'a> From<&'a RegisterRequest> for RegisterBody<'a> {
    fn from(request: &'a RegisterRequest) -> Self {
        Self {
            username: &request.username,
            email: request.email.as_str(),
            password: request.password.expose_secret(),
            first_name: request.first_name.as_deref(),
            last_name: request.last_name.as_deref(),
        }
    }
}

/// `data` of a successful login.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserSummary,
}

impl std::fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPayload")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Envelope returned by `POST /auth/login`.
///
/// `data` is absent or `null` when the server refuses the login with a 2xx
/// status and `success: false`.
pub type AuthResponse = ApiResponse<Option<AuthPayload>>;

/// Envelope returned by `POST /auth/register`.
///
/// The shape of `data` is not fixed by the API, so it is kept as raw JSON.
pub type RegisterResponse = ApiResponse<Option<serde_json::Value>>;
