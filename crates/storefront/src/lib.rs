//! Jaangkhon storefront client library.
//!
//! Talks to the marketplace REST API, keeps the login session in a pluggable
//! store, and holds the presentation state of the storefront pages so it can
//! be driven and tested without a browser.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod search;
pub mod services;
pub mod session;
pub mod state;
pub mod views;
