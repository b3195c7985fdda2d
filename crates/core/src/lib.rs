//! Jaangkhon Core - Shared types library.
//!
//! This crate provides the domain types used across the Jaangkhon marketplace
//! client components:
//! - `storefront` - HTTP client, session handling and view controllers
//! - `cli` - Command-line front end for the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, emails, products and user summaries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
