//! Comptoir Client - Typed HTTP client for the catalog/e-commerce backend.
//!
//! # Architecture
//!
//! [`ApiClient`] aggregates one service per backend resource (users,
//! products, categories, cart, orders, dashboard). Every request carries
//! exactly one identity:
//!
//! - `Authorization: Bearer <token>` once a user has signed in
//! - `x-session-token: <uuid>` for anonymous visitors, created on first use
//!
//! The identity lives in a session persisted through a [`SessionStore`], so
//! an anonymous cart or a signed-in user survives process restarts.
//!
//! # Modules
//!
//! - [`config`] - Base URL, extra headers and timeout
//! - [`services`] - Per-resource operations
//! - [`store`] - Session persistence (memory and JSON file)
//! - [`session`] - Identity resolution
//! - [`error`] - Error types

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
pub mod config;
pub mod error;
mod resource;
pub mod services;
pub mod session;
pub mod store;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use resource::ApiResponse;
pub use services::{
    CartScope, CartService, CategoryService, DashboardService, OrderService, ProductService,
    UserService,
};
pub use session::{Identity, SESSION_TOKEN_HEADER};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError, StoredSession};
