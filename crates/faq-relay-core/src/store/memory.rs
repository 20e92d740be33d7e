//! In-memory [`KnowledgeStore`] implementation for tests.
//!
//! Uses `Vec`s behind `std::sync::RwLock` for thread safety. Appends go to
//! the end, matching the row order of a real spreadsheet store.

use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{KnowledgeEntry, UnansweredRecord};

use super::KnowledgeStore;

/// In-memory store for tests and local experimentation.
pub struct InMemoryStore {
    entries: RwLock<Vec<KnowledgeEntry>>,
    unanswered: RwLock<Vec<UnansweredRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            unanswered: RwLock::new(Vec::new()),
        }
    }

    pub fn with_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
            unanswered: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of all entries, for assertions.
    pub fn entries(&self) -> Vec<KnowledgeEntry> {
        self.entries.read().unwrap().clone()
    }

    /// Snapshot of all unanswered records, for assertions.
    pub fn unanswered(&self) -> Vec<UnansweredRecord> {
        self.unanswered.read().unwrap().clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryStore {
    async fn fetch_entries(&self) -> Result<Vec<KnowledgeEntry>> {
        Ok(self.entries.read().unwrap().clone())
    }

    async fn append_entry(&self, entry: &KnowledgeEntry) -> Result<()> {
        self.entries.write().unwrap().push(entry.clone());
        Ok(())
    }

    async fn append_unanswered(&self, record: &UnansweredRecord) -> Result<()> {
        self.unanswered.write().unwrap().push(record.clone());
        Ok(())
    }
}
