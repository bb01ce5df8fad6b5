use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::config::LlmConfig;

const GENERATION_PATH: &str = "/ml/v1/text/generation";
const API_VERSION: &str = "2023-05-29";
const MIN_NEW_TOKENS: u32 = 5;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Generation failed after {attempts} attempts: {source}")]
    AttemptsExhausted {
        attempts: u32,
        source: reqwest::Error,
    },
    #[error("Model returned an empty response")]
    EmptyResponse,
}

pub type LlmResult<T> = Result<T, LlmError>;

/// A text-generation backend. The pipeline only needs prompt-in/text-out;
/// everything else (transport, auth, retry) lives behind this trait.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> LlmResult<String>;
}

/// watsonx.ai text-generation client.
///
/// Greedy decoding at temperature 0, matching what the extraction prompts
/// were written against. The generation call is the pipeline's only
/// unreliable I/O, so it carries a request timeout and bounded retry with
/// exponential backoff.
#[derive(Debug)]
pub struct WatsonxClient {
    config: LlmConfig,
    endpoint: Url,
    inner: Client,
}

impl WatsonxClient {
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        let endpoint = Url::parse(&config.url)?.join(GENERATION_PATH)?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            config,
            endpoint,
            inner,
        })
    }

    async fn generate_once(&self, prompt: &str) -> LlmResult<String> {
        let body = json!({
            "model_id": self.config.model_id,
            "project_id": self.config.project_id,
            "input": prompt,
            "parameters": {
                "decoding_method": "greedy",
                "max_new_tokens": self.config.max_new_tokens,
                "min_new_tokens": MIN_NEW_TOKENS,
                "temperature": 0,
            },
        });

        let response = self
            .inner
            .post(self.endpoint.clone())
            .query(&[("version", API_VERSION)])
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        payload
            .pointer("/results/0/generated_text")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToString::to_string)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl LlmClient for WatsonxClient {
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut delay = Duration::from_millis(self.config.retry_backoff_ms);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.generate_once(prompt).await {
                Ok(text) => return Ok(text),
                Err(LlmError::Http(source)) if is_retryable(&source) => {
                    if attempt >= max_attempts {
                        return Err(LlmError::AttemptsExhausted {
                            attempts: attempt,
                            source,
                        });
                    }
                    tracing::warn!(attempt, error = %source, "generation failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(other) => return Err(other),
            }
        }
    }
}

fn is_retryable(error: &reqwest::Error) -> bool {
    error.is_timeout()
        || error.is_connect()
        || error
            .status()
            .is_some_and(|status| status.is_server_error() || status.as_u16() == 429)
}
