//! Subcommand implementations.

pub mod auth;
pub mod products;

use thiserror::Error;

use jaangkhon_core::{EmailError, UserRole};

/// Errors raised by the CLI itself, before or after talking to the API.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The server answered but reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("Nothing to update: pass at least one field to change")]
    EmptyUpdate,

    #[error("Not logged in: run `jk-cli login` with a seller or admin account")]
    NotLoggedIn,

    #[error("Accounts with role {0} cannot manage products")]
    NotPermitted(UserRole),
}
