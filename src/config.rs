use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use faq_relay_core::engine::EngineOptions;
use faq_relay_core::normalize::Normalizer;
use faq_relay_core::resolve::GeneratedPersistence;
use faq_relay_core::score::{Scorer, TokenMetric};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub provenance: ProvenanceConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub spreadsheet_id: String,
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default = "default_append_range")]
    pub append_range: String,
    #[serde(default = "default_has_header")]
    pub has_header: bool,
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_range() -> String {
    "Sheet1!A:B".to_string()
}
fn default_append_range() -> String {
    "Sheet1!A:B".to_string()
}
fn default_has_header() -> bool {
    true
}
fn default_token_env() -> String {
    "SHEETS_ACCESS_TOKEN".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_char_weight")]
    pub char_weight: f64,
    #[serde(default = "default_token_weight")]
    pub token_weight: f64,
    #[serde(default = "default_token_metric")]
    pub token_metric: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            char_weight: default_char_weight(),
            token_weight: default_token_weight(),
            token_metric: default_token_metric(),
        }
    }
}

fn default_threshold() -> f64 {
    0.7
}
fn default_char_weight() -> f64 {
    0.7
}
fn default_token_weight() -> f64 {
    0.3
}
fn default_token_metric() -> String {
    "overlap".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_new_tokens: Option<u32>,
    #[serde(default = "default_unresolved_message")]
    pub unresolved_message: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_new_tokens: None,
            unresolved_message: default_unresolved_message(),
        }
    }
}

impl FallbackConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_api_key_env() -> String {
    "FALLBACK_API_KEY".to_string()
}
fn default_unresolved_message() -> String {
    "Sorry, no suitable answer was found.".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvenanceConfig {
    #[serde(default = "default_persist_generated")]
    pub persist_generated: String,
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            persist_generated: default_persist_generated(),
        }
    }
}

fn default_persist_generated() -> String {
    "append".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7307".to_string()
}

impl Config {
    /// Build the engine options this configuration describes.
    pub fn engine_options(&self) -> Result<EngineOptions> {
        let metric = match self.matching.token_metric.as_str() {
            "overlap" => TokenMetric::Overlap,
            "cosine" => TokenMetric::Cosine,
            other => anyhow::bail!(
                "Unknown token metric: '{}'. Must be overlap or cosine.",
                other
            ),
        };
        let persist = match self.provenance.persist_generated.as_str() {
            "append" => GeneratedPersistence::Append,
            "review-only" => GeneratedPersistence::ReviewOnly,
            other => anyhow::bail!(
                "Unknown persist_generated mode: '{}'. Must be append or review-only.",
                other
            ),
        };
        Ok(EngineOptions {
            threshold: self.matching.threshold,
            scorer: Scorer::new(self.matching.char_weight, self.matching.token_weight, metric),
            normalizer: Normalizer::new(),
            persist_generated: persist,
        })
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate store
    if config.store.spreadsheet_id.trim().is_empty() {
        anyhow::bail!("store.spreadsheet_id must not be empty");
    }

    // Validate matching
    if !(0.0..=1.0).contains(&config.matching.threshold) {
        anyhow::bail!("matching.threshold must be in [0.0, 1.0]");
    }
    if config.matching.char_weight < 0.0 || config.matching.token_weight < 0.0 {
        anyhow::bail!("matching weights must be non-negative");
    }
    if config.matching.char_weight + config.matching.token_weight <= 0.0 {
        anyhow::bail!("matching weights must not both be zero");
    }
    match config.matching.token_metric.as_str() {
        "overlap" | "cosine" => {}
        other => anyhow::bail!(
            "Unknown token metric: '{}'. Must be overlap or cosine.",
            other
        ),
    }

    // Validate fallback
    match config.fallback.provider.as_str() {
        "disabled" => {}
        "hosted" => {
            if config
                .fallback
                .endpoint
                .as_deref()
                .unwrap_or("")
                .trim()
                .is_empty()
            {
                anyhow::bail!("fallback.endpoint must be set when provider is 'hosted'");
            }
        }
        other => anyhow::bail!(
            "Unknown fallback provider: '{}'. Must be disabled or hosted.",
            other
        ),
    }

    // Validate provenance
    match config.provenance.persist_generated.as_str() {
        "append" | "review-only" => {}
        other => anyhow::bail!(
            "Unknown persist_generated mode: '{}'. Must be append or review-only.",
            other
        ),
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let file = write_config(
            r#"
[store]
spreadsheet_id = "abc123"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.store.range, "Sheet1!A:B");
        assert!(config.store.has_header);
        assert_eq!(config.matching.threshold, 0.7);
        assert_eq!(config.matching.token_metric, "overlap");
        assert_eq!(config.fallback.provider, "disabled");
        assert!(!config.fallback.is_enabled());
        assert_eq!(config.provenance.persist_generated, "append");
        assert_eq!(config.server.bind, "127.0.0.1:7307");
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let file = write_config(
            r#"
[store]
spreadsheet_id = "abc123"

[matching]
threshold = 1.5
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn test_zero_weights_rejected() {
        let file = write_config(
            r#"
[store]
spreadsheet_id = "abc123"

[matching]
char_weight = 0.0
token_weight = 0.0
"#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_hosted_provider_requires_endpoint() {
        let file = write_config(
            r#"
[store]
spreadsheet_id = "abc123"

[fallback]
provider = "hosted"
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("endpoint"));
    }

    #[test]
    fn test_unknown_persistence_mode_rejected() {
        let file = write_config(
            r#"
[store]
spreadsheet_id = "abc123"

[provenance]
persist_generated = "sometimes"
"#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_engine_options_reflect_config() {
        let file = write_config(
            r#"
[store]
spreadsheet_id = "abc123"

[matching]
threshold = 0.5
token_metric = "cosine"

[provenance]
persist_generated = "review-only"
"#,
        );
        let config = load_config(file.path()).unwrap();
        let opts = config.engine_options().unwrap();
        assert_eq!(opts.threshold, 0.5);
        assert_eq!(
            opts.persist_generated,
            faq_relay_core::resolve::GeneratedPersistence::ReviewOnly
        );
    }
}
