//! FeastFlow Core - Shared types library.
//!
//! This crate provides common types used across all FeastFlow components:
//! - `api` - The REST backend (auth, cart, dashboard, network diagnostics)
//! - `cli` - Command-line tools for migrations and user management
//! - `integration-tests` - End-to-end tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
