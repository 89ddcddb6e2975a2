//! # inference-adapters
//!
//! Hugging Face Inference API implementation of `TextGenerator`.
//!
//! One POST per call, bearer-authenticated, no retries: the caller decides
//! whether to run the whole pipeline again.

use std::time::Duration;

use async_trait::async_trait;
use domains::{GenerationError, GenerationParams, TextGenerator};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/models";
pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// `None` is allowed at construction; every `generate` call then fails
    /// with [`GenerationError::MissingCredential`] before touching the network.
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
}

#[derive(Deserialize)]
struct Candidate {
    generated_text: Option<String>,
}

pub struct HuggingFaceClient {
    http: reqwest::Client,
    api_key: Option<SecretString>,
    endpoint: String,
}

impl HuggingFaceClient {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key: config.api_key,
            endpoint: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                config.model.trim_start_matches('/')
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// First candidate's text; blank output counts as no output.
fn first_generated_text(body: &str) -> Result<String, GenerationError> {
    let candidates: Vec<Candidate> = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedPayload(e.to_string()))?;

    candidates
        .into_iter()
        .next()
        .and_then(|c| c.generated_text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::EmptyOutput)
}

#[async_trait]
impl TextGenerator for HuggingFaceClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(GenerationError::MissingCredential)?;

        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "calling inference endpoint");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(&InferenceRequest {
                inputs: prompt,
                parameters: params,
            })
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await;

        if !status.is_success() {
            let body = body.unwrap_or_else(|e| {
                warn!(error = %e, "could not read HF error body");
                String::new()
            });
            error!(status = status.as_u16(), body = %body, "HF API error");
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = body.map_err(|e| GenerationError::Transport(e.to_string()))?;
        first_generated_text(&body)
    }
}
