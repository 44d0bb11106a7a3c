use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::application::ChatClient;
use crate::domain::{ChatPrompt, DomainError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
/// The model every answer is generated with unless `OPENAI_MODEL` says otherwise.
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Where the bearer token comes from.
#[derive(Debug, Clone)]
enum ApiKeySource {
    /// Read from this environment variable on every request.
    Env(String),
    Fixed(String),
}

/// HTTP client for the OpenAI Chat Completions API (and compatible servers).
///
/// The API key is looked up when each request is made, not at construction,
/// so a missing `OPENAI_API_KEY` only fails the requests that need it:
///
/// ```text
/// OPENAI_API_KEY=sk-...
/// OPENAI_BASE_URL=https://api.openai.com
/// OPENAI_MODEL=gpt-4o
/// ```
pub struct OpenAiClient {
    client: reqwest::Client,
    model: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
    api_key: ApiKeySource,
}

impl OpenAiClient {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{COMPLETIONS_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            model: model.into(),
            url,
            api_key: ApiKeySource::Env(API_KEY_ENV.to_string()),
        }
    }

    /// Construct from environment variables:
    ///
    /// | Variable          | Default                  |
    /// |-------------------|--------------------------|
    /// | `OPENAI_BASE_URL` | `https://api.openai.com` |
    /// | `OPENAI_MODEL`    | `gpt-4o`                 |
    pub fn from_env() -> Self {
        let base =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(model, base)
    }

    /// Use a fixed key instead of reading the environment.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = ApiKeySource::Fixed(key.into());
        self
    }

    /// Read the key from `var` instead of `OPENAI_API_KEY`.
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key = ApiKeySource::Env(var.into());
        self
    }

    fn resolve_api_key(&self) -> Result<String, DomainError> {
        let key = match &self.api_key {
            ApiKeySource::Fixed(key) => key.clone(),
            ApiKeySource::Env(var) => std::env::var(var).unwrap_or_default(),
        };
        if key.trim().is_empty() {
            let source = match &self.api_key {
                ApiKeySource::Env(var) => var.as_str(),
                ApiKeySource::Fixed(_) => "configured API key",
            };
            return Err(DomainError::configuration(format!("{source} is not set")));
        }
        Ok(key)
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, DomainError> {
        let api_key = self.resolve_api_key()?;

        let request = ApiRequest {
            model: &self.model,
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: prompt.system(),
                },
                ApiMessage {
                    role: "user",
                    content: prompt.user(),
                },
            ],
            temperature: prompt.temperature(),
            max_tokens: prompt.max_tokens(),
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("OpenAiClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAiClient: API returned {status}: {body}");
            return Err(DomainError::upstream(format!(
                "OpenAiClient: API returned {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::upstream(format!("OpenAiClient: failed to parse response: {e}"))
        })?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DomainError::upstream("OpenAiClient: response contained no message"))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
