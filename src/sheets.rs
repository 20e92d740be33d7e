//! Spreadsheet-backed knowledge store client.
//!
//! Implements [`KnowledgeStore`] against the Google Sheets values API:
//! `GET /v4/spreadsheets/{id}/values/{range}` for the row snapshot and
//! `POST /v4/spreadsheets/{id}/values/{range}:append` for provenance rows.
//! The first column holds the question, the second the answer; a header row
//! is skipped exactly once when configured. Credentials are a bearer token
//! read from the environment; acquiring one is outside this crate.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::debug;

use faq_relay_core::models::{KnowledgeEntry, UnansweredRecord};
use faq_relay_core::store::KnowledgeStore;

use crate::config::StoreConfig;

pub struct SheetsStore {
    client: reqwest::Client,
    cfg: StoreConfig,
    url_values: String,
    url_append: String,
}

impl SheetsStore {
    pub fn new(cfg: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        let base = cfg.base_url.trim_end_matches('/');
        let url_values = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            base, cfg.spreadsheet_id, cfg.range
        );
        let url_append = format!(
            "{}/v4/spreadsheets/{}/values/{}:append?valueInputOption=RAW",
            base, cfg.spreadsheet_id, cfg.append_range
        );

        Ok(Self {
            client,
            cfg: cfg.clone(),
            url_values,
            url_append,
        })
    }

    fn token(&self) -> Result<String> {
        std::env::var(&self.cfg.token_env)
            .with_context(|| format!("{} environment variable not set", self.cfg.token_env))
    }

    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<()> {
        let body = serde_json::json!({ "values": rows });

        debug!("POST {}", self.url_append);
        let resp = self
            .client
            .post(&self.url_append)
            .bearer_auth(self.token()?)
            .json(&body)
            .send()
            .await
            .context("sheets append request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("sheets append returned {}: {}", status, snippet(&text));
        }
        Ok(())
    }
}

/// Convert a values payload into entries, skipping the header row once.
///
/// Missing cells become empty strings, matching the store's sparse-row
/// behavior. A payload without a `values` array is an empty sheet.
pub fn rows_to_entries(json: &serde_json::Value, has_header: bool) -> Vec<KnowledgeEntry> {
    let rows = match json.get("values").and_then(|v| v.as_array()) {
        Some(rows) => rows,
        None => return Vec::new(),
    };

    let skip = usize::from(has_header);
    rows.iter()
        .skip(skip)
        .map(|row| {
            let cell = |i: usize| {
                row.get(i)
                    .and_then(|c| c.as_str())
                    .unwrap_or("")
                    .to_string()
            };
            KnowledgeEntry {
                question: cell(0),
                answer: cell(1),
            }
        })
        .collect()
}

fn snippet(text: &str) -> String {
    text.chars().take(240).collect()
}

#[async_trait]
impl KnowledgeStore for SheetsStore {
    async fn fetch_entries(&self) -> Result<Vec<KnowledgeEntry>> {
        debug!("GET {}", self.url_values);
        let resp = self
            .client
            .get(&self.url_values)
            .bearer_auth(self.token()?)
            .send()
            .await
            .context("sheets values request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("sheets values returned {}: {}", status, snippet(&text));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .context("invalid sheets values payload")?;
        Ok(rows_to_entries(&json, self.cfg.has_header))
    }

    async fn append_entry(&self, entry: &KnowledgeEntry) -> Result<()> {
        self.append_rows(vec![vec![entry.question.clone(), entry.answer.clone()]])
            .await
    }

    async fn append_unanswered(&self, record: &UnansweredRecord) -> Result<()> {
        self.append_rows(vec![vec![record.question.clone()]]).await
    }
}
