//! Comptoir Core - Shared types library.
//!
//! This crate provides the domain types shared by every Comptoir component:
//! - `comptoir-client` - Typed HTTP client for the catalog/e-commerce backend
//! - `comptoir-cli` - Command-line storefront and admin console
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients, no persistence. Records mirror the backend's JSON (camelCase)
//! and carry no invariants beyond typing; the backend owns pricing, stock
//! and order-status transitions.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, quantities, statuses and roles
//! - [`models`] - Entity records and request/response DTOs
//! - [`format`] - Date formatting used by the console views

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod format;
pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
