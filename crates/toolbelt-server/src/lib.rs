//! HTTP server library for toolbelt.
//!
//! Exposes the router builder and shared state so integration tests can
//! drive the full API against an in-memory database.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
