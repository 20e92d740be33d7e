//! # FAQ Relay Core
//!
//! Shared, I/O-free logic for FAQ Relay: data models, text normalization,
//! similarity scoring, best-match selection, the resolution policy, and the
//! knowledge-store abstraction.
//!
//! This crate contains no tokio, reqwest, filesystem I/O, or other
//! native-only dependencies. Adapters (HTTP server, CLI, spreadsheet store
//! client, generation-service client) live in the application crate and plug
//! in through the [`store::KnowledgeStore`] and [`resolve::AnswerGenerator`]
//! traits.

pub mod engine;
pub mod models;
pub mod normalize;
pub mod resolve;
pub mod score;
pub mod select;
pub mod store;
