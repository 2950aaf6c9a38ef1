//! Business logic services.
//!
//! Services sit between the HTTP routes and the repositories. They validate
//! request input, enforce the cart and auth rules and never touch HTTP types.

pub mod access;
pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod network;
