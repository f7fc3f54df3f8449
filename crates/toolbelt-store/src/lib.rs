//! SQLite persistence layer for toolbelt.
//!
//! Owns the schema, the typed row models, and one repository module per
//! table family (notes, tasks, scripts, secrets). Repositories are free
//! functions taking a `&SqlitePool` — callers decide how to map
//! `Option`/`bool` results onto their own not-found semantics.
//!
//! Secret values cross this layer only as ciphertext: the `secrets` table
//! stores `(ciphertext, nonce, tag)` blobs produced by `toolbelt-core` and
//! this crate never sees plaintext or key material.

pub mod db;
pub mod error;
pub mod models;
pub mod notes;
pub mod scripts;
pub mod secrets;
pub mod tasks;

pub use error::StoreError;
