//! Persisted session state.
//!
//! The session is two string entries, [`keys::TOKEN`] and [`keys::USER`], kept
//! in a [`SessionStore`]. The store is injected into the HTTP client and the
//! auth service, so the backend can be swapped: [`MemoryStore`] for tests and
//! embedding, [`FileStore`] for the CLI where the session must survive between
//! runs.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use secrecy::SecretString;
use thiserror::Error;

use jaangkhon_core::UserSummary;

/// Session keys shared by every store.
pub mod keys {
    /// Key for the raw bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the JSON-serialized [`UserSummary`](jaangkhon_core::UserSummary).
    pub const USER: &str = "user";
}

/// Errors raised by a session store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A lock guarding in-memory state was poisoned.
    #[error("Lock poisoned")]
    Poisoned,
}

/// String key-value storage for session entries.
///
/// Calls are synchronous and each call is atomic on its own; there is no
/// transaction spanning several keys.
pub trait SessionStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Delete both session entries.
    ///
    /// Both removals are attempted even if the first fails; the first error
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if either removal fails.
    fn clear(&self) -> Result<(), StoreError> {
        let token = self.remove(keys::TOKEN);
        let user = self.remove(keys::USER);
        token.and(user)
    }
}

/// An authenticated session: the bearer token and the user it belongs to.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: UserSummary,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}
