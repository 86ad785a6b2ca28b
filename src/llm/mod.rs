//! LLM provider abstraction.

mod ollama;

use async_trait::async_trait;
use thiserror::Error;

pub use ollama::OllamaClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid stream line: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("LLM API error: {0}")]
    Api(String),
}

/// A text completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete `prompt`, calling `on_chunk` once per streamed piece of output.
    ///
    /// Returns the full completion text.
    async fn complete(
        &self,
        model: &str,
        temperature: f32,
        prompt: &str,
        on_chunk: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String, LlmError>;
}
