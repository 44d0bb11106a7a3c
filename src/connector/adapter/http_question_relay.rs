use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::application::QuestionRelay;
use crate::domain::{DomainError, Question};

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000";
pub const ASK_QUESTION_PATH: &str = "/api/ask-question";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

/// Calls the relay's `POST /api/ask-question` endpoint.
pub struct HttpQuestionRelay {
    client: reqwest::Client,
    url: String,
}

impl HttpQuestionRelay {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{ASK_QUESTION_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url,
        }
    }

    /// Target the relay named by `RELAY_URL`, defaulting to a local server.
    pub fn from_env() -> Self {
        let base = std::env::var("RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());
        Self::new(base)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The answer must be a non-empty string under `response`.
    fn extract_answer(body: Value) -> Result<String, DomainError> {
        match body.get("response") {
            Some(Value::String(answer)) if !answer.is_empty() => Ok(answer.clone()),
            _ => Err(DomainError::format("expected a string `response` field")),
        }
    }
}

#[async_trait]
impl QuestionRelay for HttpQuestionRelay {
    async fn ask(&self, question: &Question) -> Result<String, DomainError> {
        debug!("POST {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .json(&AskRequest {
                question: question.as_str(),
            })
            .send()
            .await
            .map_err(|e| DomainError::network(format!("relay unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::transport(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DomainError::format(format!("body is not JSON: {e}")))?;

        Self::extract_answer(body)
    }
}
