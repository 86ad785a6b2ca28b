//! Configuration management for prompt-pilot.
//!
//! Configuration can be set via environment variables:
//! - `AUTOMATION_URL` - Optional. Base URL of the automation service. Defaults to `http://localhost:8080/api`.
//! - `OLLAMA_URL` - Optional. Base URL of the local LLM runtime. Defaults to `http://localhost:11434`.
//! - `PROMPTS_DIR` - Optional. Directory holding `{template}.txt` prompt files. Defaults to `prompts`.
//! - `BOOTSTRAP_SCRIPT` - Optional. Script run at startup. Defaults to `init.rhai`.
//! - `STREAM_OUTPUT` - Optional. Echo completion chunks to stdout as they arrive. Defaults to `true`.

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_AUTOMATION_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Automation service base URL (endpoints are appended verbatim)
    pub automation_url: String,

    /// LLM runtime base URL
    pub ollama_url: String,

    /// Prompt template directory
    pub prompts_dir: PathBuf,

    /// Script executed before any CLI logic
    pub bootstrap_script: PathBuf,

    /// Print streamed completion chunks
    pub stream_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            automation_url: DEFAULT_AUTOMATION_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            prompts_dir: PathBuf::from("prompts"),
            bootstrap_script: PathBuf::from("init.rhai"),
            stream_output: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a URL does not parse or
    /// `STREAM_OUTPUT` is not boolean-like.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let automation_url = lookup("AUTOMATION_URL").unwrap_or(defaults.automation_url);
        validate_url("AUTOMATION_URL", &automation_url)?;

        let ollama_url = lookup("OLLAMA_URL").unwrap_or(defaults.ollama_url);
        validate_url("OLLAMA_URL", &ollama_url)?;

        let prompts_dir = lookup("PROMPTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.prompts_dir);

        let bootstrap_script = lookup("BOOTSTRAP_SCRIPT")
            .map(PathBuf::from)
            .unwrap_or(defaults.bootstrap_script);

        let stream_output = lookup("STREAM_OUTPUT")
            .map(|v| parse_bool(&v).map_err(|e| ConfigError::InvalidValue("STREAM_OUTPUT".to_string(), e)))
            .transpose()?
            .unwrap_or(defaults.stream_output);

        Ok(Self {
            automation_url,
            ollama_url,
            prompts_dir,
            bootstrap_script,
            stream_output,
        })
    }
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}: {}", value, e)))
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}
