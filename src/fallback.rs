//! Generative fallback clients.
//!
//! [`HostedGenerator`] wraps a hosted text-completion endpoint: HTTP POST
//! with a JSON body `{ "inputs": <question>, "parameters": {...} }`, where
//! the response is either a JSON array of generation objects (the first
//! element's `generated_text` field is the answer) or an error object.
//!
//! A single attempt per request, no retries: the engine absorbs every
//! error here into the unresolved path, and a retry would duplicate an
//! externally billed call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use faq_relay_core::resolve::AnswerGenerator;

use crate::config::FallbackConfig;

/// Errors produced by the generation clients.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// No fallback service is configured.
    #[error("fallback provider is disabled")]
    Disabled,

    /// Invalid endpoint (empty or missing http/https).
    #[error("invalid fallback endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport/HTTP client error (including timeouts).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("failed to decode generation response: {0}")]
    Decode(String),
}

/// Client for a hosted text-completion endpoint.
pub struct HostedGenerator {
    client: reqwest::Client,
    url: String,
    api_key_env: String,
    max_new_tokens: Option<u32>,
}

impl HostedGenerator {
    pub fn new(cfg: &FallbackConfig) -> Result<Self, GeneratorError> {
        let endpoint = cfg.endpoint.as_deref().unwrap_or("").trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(GeneratorError::InvalidEndpoint(endpoint.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: endpoint.trim_end_matches('/').to_string(),
            api_key_env: cfg.api_key_env.clone(),
            max_new_tokens: cfg.max_new_tokens,
        })
    }
}

/// Request body for the completion endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<GenerateParameters>,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
}

/// Extract the generated text from a completion response.
pub fn parse_generation_response(json: &serde_json::Value) -> Result<String, GeneratorError> {
    if let Some(err) = json.get("error") {
        return Err(GeneratorError::Decode(format!("service error: {}", err)));
    }

    json.as_array()
        .and_then(|items| items.first())
        .and_then(|item| item.get("generated_text"))
        .and_then(|text| text.as_str())
        .map(str::to_string)
        .ok_or_else(|| GeneratorError::Decode("missing generated_text field".to_string()))
}

#[async_trait]
impl AnswerGenerator for HostedGenerator {
    async fn generate(&self, question: &str) -> anyhow::Result<String> {
        let body = GenerateRequest {
            inputs: question,
            parameters: self
                .max_new_tokens
                .map(|max_new_tokens| GenerateParameters { max_new_tokens }),
        };

        debug!("POST {}", self.url);
        let mut request = self.client.post(&self.url).json(&body);
        if let Ok(key) = std::env::var(&self.api_key_env) {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await.map_err(GeneratorError::Transport)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(GeneratorError::HttpStatus {
                status,
                url: self.url.clone(),
                snippet: text.chars().take(240).collect(),
            }
            .into());
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GeneratorError::Decode(e.to_string()))?;
        Ok(parse_generation_response(&json)?)
    }
}

/// Generator used when no fallback service is configured. Always fails,
/// which the engine turns into the unresolved path.
pub struct DisabledGenerator;

#[async_trait]
impl AnswerGenerator for DisabledGenerator {
    async fn generate(&self, _question: &str) -> anyhow::Result<String> {
        Err(GeneratorError::Disabled.into())
    }
}

/// Create the generator matching the configuration.
pub fn create_generator(cfg: &FallbackConfig) -> anyhow::Result<Box<dyn AnswerGenerator>> {
    match cfg.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledGenerator)),
        "hosted" => Ok(Box::new(HostedGenerator::new(cfg)?)),
        other => anyhow::bail!("Unknown fallback provider: {}", other),
    }
}
