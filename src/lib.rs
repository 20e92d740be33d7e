//! FAQ Relay application crate.
//!
//! Wires the resolution engine from `faq-relay-core` to its runtime
//! surroundings: TOML configuration, a Google Sheets knowledge store, a
//! hosted-generation fallback client, and the CLI/HTTP entry points.

pub mod ask;
pub mod config;
pub mod fallback;
pub mod server;
pub mod sheets;
