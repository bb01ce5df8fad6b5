use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable naming the master pricing workbook, used when the
/// CLI flag is absent.
pub const MASTER_ENV_VAR: &str = "QUOTEMILL_MASTER";

pub const DEFAULT_MODEL_ID: &str = "meta-llama/llama-3-2-90b-vision-instruct";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Connection settings for the text-generation service.
///
/// Credentials and endpoint come from the process environment; decoding
/// parameters are fixed to the values the extraction prompts were tuned
/// against (greedy, temperature 0).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub url: String,
    pub api_key: String,
    pub project_id: String,
    pub model_id: String,
    pub max_new_tokens: u32,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl LlmConfig {
    /// Read `WATSONX_URL`, `WATSONX_APIKEY`, `WATSONX_PROJECT_ID` and the
    /// optional `WATSONX_MODEL_ID` from the environment.
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            url: required("WATSONX_URL")?,
            api_key: required("WATSONX_APIKEY")?,
            project_id: required("WATSONX_PROJECT_ID")?,
            model_id: env::var("WATSONX_MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.into()),
            ..Self::defaults()
        })
    }

    fn defaults() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            project_id: String::new(),
            model_id: DEFAULT_MODEL_ID.into(),
            max_new_tokens: 1500,
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
            max_attempts: 3,
            retry_backoff_ms: 500,
        }
    }

    /// Settings for a client under test: no real endpoint required.
    #[must_use]
    pub fn for_endpoint(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: "test-key".into(),
            project_id: "test-project".into(),
            ..Self::defaults()
        }
    }
}

fn required(name: &'static str) -> ConfigResult<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

/// Master workbook path from the environment, if configured.
#[must_use]
pub fn master_path_from_env() -> Option<PathBuf> {
    env::var(MASTER_ENV_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}
