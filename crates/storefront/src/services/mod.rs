//! Services built on the API client.
//!
//! # Services
//!
//! - `auth` - Login, register, logout and the locally persisted session
//! - `catalog` - Product listing and product CRUD

pub mod auth;
pub mod catalog;

pub use auth::AuthService;
pub use catalog::CatalogService;
