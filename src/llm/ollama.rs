//! Streaming client for a local Ollama runtime.

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;

use super::{LlmError, LlmProvider};

/// One NDJSON line of `/api/generate` output.
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct OllamaClient {
    base_url: String,
    http: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }
}

/// Apply one line to the accumulated completion. Returns `true` once the stream is done.
fn handle_line(
    line: &[u8],
    completion: &mut String,
    on_chunk: &mut (dyn for<'s> FnMut(&'s str) + Send),
) -> Result<bool, LlmError> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Ok(false);
    }

    let chunk: GenerateChunk = serde_json::from_slice(line)?;
    if let Some(error) = chunk.error {
        return Err(LlmError::Api(error));
    }
    if !chunk.response.is_empty() {
        on_chunk(&chunk.response);
        completion.push_str(&chunk.response);
    }
    Ok(chunk.done)
}

#[async_trait]
impl LlmProvider for OllamaClient {
    async fn complete(
        &self,
        model: &str,
        temperature: f32,
        prompt: &str,
        on_chunk: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String, LlmError> {
        let endpoint = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": model,
            "prompt": prompt,
            "stream": true,
            "options": { "temperature": temperature }
        });

        tracing::debug!(model = %model, temperature, "Requesting completion");

        let response = self.http.post(&endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api(format!("Ollama API error {}: {}", status, error_text)));
        }

        let mut stream = response.bytes_stream();
        let mut buf = Vec::<u8>::new();
        let mut completion = String::new();

        while let Some(chunk) = stream.next().await {
            buf.extend_from_slice(&chunk?);
            while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                let line = buf.drain(..=pos).collect::<Vec<u8>>();
                if handle_line(&line, &mut completion, on_chunk)? {
                    return Ok(completion);
                }
            }
        }

        // Stream ended without a trailing newline
        handle_line(&buf, &mut completion, on_chunk)?;
        Ok(completion)
    }
}
