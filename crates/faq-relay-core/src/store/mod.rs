//! Storage abstraction for the knowledge base.
//!
//! The [`KnowledgeStore`] trait covers the operations the engine needs from
//! the externally hosted question/answer table: read the current row
//! snapshot and append provenance rows. Consistency and ordering guarantees
//! are entirely delegated to the external store; the engine tolerates a
//! stale read of rows added by a concurrent request.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{KnowledgeEntry, UnansweredRecord};

#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Fetch the current snapshot of knowledge-base rows, in store row
    /// order. Called fresh per request; nothing is cached across requests.
    async fn fetch_entries(&self) -> Result<Vec<KnowledgeEntry>>;

    /// Append a new question/answer row. Append-only; existing rows are
    /// never updated or deleted.
    async fn append_entry(&self, entry: &KnowledgeEntry) -> Result<()>;

    /// Append a bare question flagged for manual curation.
    async fn append_unanswered(&self, record: &UnansweredRecord) -> Result<()>;
}
