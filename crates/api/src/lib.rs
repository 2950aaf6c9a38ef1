//! FeastFlow API library.
//!
//! The HTTP backend for FeastFlow: authentication, single-restaurant carts,
//! the admin dashboard and Kubernetes network diagnostics. Exposed as a
//! library so the router can be tested and the CLI can reuse the
//! repositories and password hashing.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
