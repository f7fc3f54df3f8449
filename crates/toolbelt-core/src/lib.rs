//! Core library for toolbelt.
//!
//! Contains the cryptographic primitives, the secret vault (authenticated
//! encryption at rest over the store), and the script template engine.
//! This crate depends on `toolbelt-store` for persistence and knows
//! nothing about HTTP.

pub mod crypto;
pub mod error;
pub mod template;
pub mod vault;
