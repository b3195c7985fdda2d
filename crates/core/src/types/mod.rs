//! Core types for the Jaangkhon marketplace.
//!
//! This module provides type-safe wrappers for the catalog and account
//! concepts exchanged with the marketplace API.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use product::{NewProduct, Product, ProductPatch};
pub use user::{UserRole, UserSummary};
