//! HTTP relay in front of the Meow Facts API.
//!
//! # Overview
//! Serves a small browser form at `/` and a JSON endpoint at `/api/facts`.
//! The endpoint reads `count`, `lang` and `id` from the query, asks
//! `meowfacts_core::FactsClient` for facts, and always answers with a JSON
//! envelope: `{"success": true, "facts": [...]}` with 200, or
//! `{"success": false, "error": "..."}` with 400.

pub mod assets;
pub mod config;
pub mod endpoint;
pub mod logging;
pub mod server;

pub use config::{ConfigError, Overrides, RelayConfig};
pub use server::{app, serve, AppState};
