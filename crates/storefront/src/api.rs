//! HTTP client wrapper for the marketplace REST API.
//!
//! Every service call goes through [`ApiClient::fetch`], which:
//! - joins the endpoint onto the configured API root,
//! - sends `Content-Type: application/json`,
//! - adds `Authorization: Bearer <token>` when the session store holds a token,
//! - serializes the body as JSON, or sends no body at all,
//! - turns any non-2xx answer into [`ClientError::Status`] carrying the
//!   server's `message`.
//!
//! Errors are logged here and returned unchanged; there is no retry.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = ApiClient::new(&config, Arc::new(MemoryStore::new()))?;
//! let page: ApiResponse<Vec<Product>> = api.get("/products").await?;
//! ```

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::config::StorefrontConfig;
use crate::error::{ClientError, GENERIC_ERROR_MESSAGE, Result};
use crate::session::{SessionStore, keys};

/// Longest slice of a response body copied into log lines.
const LOG_BODY_LIMIT: usize = 500;

/// The envelope every marketplace endpoint answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

/// Method, extra headers and optional JSON body for one request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Merged over the defaults; a header given here replaces the default of
    /// the same name.
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    /// Options for a body-less request.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Decode` if `body` cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Add or replace a header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Client for the marketplace REST API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a client for `config.api_url` that reads its bearer token from
    /// `store`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.trim_end_matches('/').to_string(),
                store,
            }),
        })
    }

    /// The API root requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Send a request and decode the 2xx body as `T`.
    ///
    /// # Errors
    ///
    /// - `ClientError::InvalidRequest` if `endpoint` does not start with `/`
    /// - `ClientError::Transport` if no response arrived
    /// - `ClientError::Status` for a non-2xx status, with the server's message
    ///   or [`GENERIC_ERROR_MESSAGE`]
    /// - `ClientError::Decode` if a 2xx body does not decode as `T`
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        if !endpoint.starts_with('/') {
            return Err(ClientError::InvalidRequest(format!(
                "endpoint must start with '/': {endpoint}"
            )));
        }
        let url = format!("{}{endpoint}", self.inner.base_url);
        let headers = self.request_headers(options.headers);

        debug!("Sending {} request to {}", options.method, url);

        let mut request = self.inner.client.request(options.method, &url).headers(headers);
        if let Some(body) = &options.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, url = %url, "Error calling endpoint");
            ClientError::Transport(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %truncate(&text),
                "API returned non-success status"
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(
                error = %e,
                body = %truncate(&text),
                "Failed to parse API response"
            );
            ClientError::Decode(e)
        })
    }

    /// `GET endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.fetch(endpoint, RequestOptions::new(Method::GET)).await
    }

    /// `POST endpoint` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(endpoint, RequestOptions::new(Method::POST).json(body)?)
            .await
    }

    /// `PUT endpoint` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(endpoint, RequestOptions::new(Method::PUT).json(body)?)
            .await
    }

    /// `DELETE endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.fetch(endpoint, RequestOptions::new(Method::DELETE))
            .await
    }

    /// Default headers plus the bearer token, overlaid with `extra`.
    fn request_headers(&self, extra: HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(value) = self.bearer_header() {
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in extra {
            if let Some(name) = name {
                headers.insert(name, value);
            }
        }
        headers
    }

    /// A store that cannot be read is treated as "no session": the request
    /// goes out anonymously instead of failing.
    fn bearer_header(&self) -> Option<HeaderValue> {
        let token = match self.inner.store.get(keys::TOKEN) {
            Ok(token) => token?,
            Err(e) => {
                warn!(error = %e, "Could not read session token, sending request without it");
                return None;
            }
        };
        if token.is_empty() {
            return None;
        }

        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                Some(value)
            }
            Err(_) => {
                warn!("Stored session token is not a valid header value, ignoring it");
                None
            }
        }
    }
}

/// Pull `message` out of an error body, falling back to the generic text for
/// empty, non-JSON or message-less bodies.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    fn client_with(store: &MemoryStore) -> ApiClient {
        let config = StorefrontConfig::with_api_url("http://localhost:5000/api/").unwrap();
        ApiClient::new(&config, Arc::new(store.clone())).unwrap()
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"success":false,"message":"Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(error_message(r#"{"message":""}"#), GENERIC_ERROR_MESSAGE);
        assert_eq!(error_message(r#"{"error":"nope"}"#), GENERIC_ERROR_MESSAGE);
        assert_eq!(error_message("<html>502</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(error_message(""), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_base_url_has_no_trailing_slash() {
        let client = client_with(&MemoryStore::new());
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }

    #[test]
    fn test_headers_without_token() {
        let client = client_with(&MemoryStore::new());
        let headers = client.request_headers(HeaderMap::new());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_headers_with_token() {
        let store = MemoryStore::new();
        store.set(keys::TOKEN, "T1").unwrap();
        let client = client_with(&store);

        let headers = client.request_headers(HeaderMap::new());
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(auth, "Bearer T1");
        assert!(auth.is_sensitive());
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let store = MemoryStore::new();
        store.set(keys::TOKEN, "").unwrap();
        let client = client_with(&store);
        assert!(client.request_headers(HeaderMap::new()).get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_caller_headers_override_defaults() {
        let store = MemoryStore::new();
        store.set(keys::TOKEN, "T1").unwrap();
        let client = client_with(&store);

        let mut extra = HeaderMap::new();
        extra.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        extra.insert("x-request-source", HeaderValue::from_static("cli"));

        let headers = client.request_headers(extra);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get("x-request-source").unwrap(), "cli");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer T1");
    }

    #[tokio::test]
    async fn test_relative_endpoint_is_rejected_before_sending() {
        let client = client_with(&MemoryStore::new());
        let err = client
            .get::<ApiResponse<serde_json::Value>>("products")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_request_options_json_body() {
        let options = RequestOptions::new(Method::POST)
            .json(&serde_json::json!({"email": "a@b.com"}))
            .unwrap();
        assert_eq!(options.method, Method::POST);
        assert_eq!(options.body.unwrap()["email"], "a@b.com");
    }
}
