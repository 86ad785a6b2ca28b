//! File helpers shared by the CLI and script bindings.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::ImageFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode base64 image: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to process PNG image: {0}")]
    Image(#[from] image::ImageError),
}

pub type FileResult<T> = Result<T, FileError>;

/// Write text to `path`, replacing any existing file.
pub fn save_to_file(content: &str, path: impl AsRef<Path>) -> FileResult<()> {
    std::fs::write(path, content)?;
    Ok(())
}

/// Read a context file as text.
pub fn load_context(path: impl AsRef<Path>) -> FileResult<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Pick the prompt context: a context file wins over inline data, which wins
/// over piped input. `piped` is only called when neither flag is set.
pub fn resolve_context(
    file: Option<&Path>,
    data: Option<&str>,
    piped: impl FnOnce() -> std::io::Result<String>,
) -> FileResult<String> {
    if let Some(path) = file {
        return load_context(path);
    }
    if let Some(data) = data {
        return Ok(data.to_string());
    }
    Ok(piped()?)
}

/// Standard base64 encoding of a file's raw bytes.
pub fn encode_file_base64(path: impl AsRef<Path>) -> FileResult<String> {
    let bytes = std::fs::read(path)?;
    Ok(BASE64.encode(bytes))
}

/// Remove a leading `data:<mime>;base64,` header, if any.
fn strip_data_url(encoded: &str) -> &str {
    let trimmed = encoded.trim();
    if trimmed.starts_with("data:") {
        if let Some(idx) = trimmed.find(";base64,") {
            return &trimmed[idx + ";base64,".len()..];
        }
    }
    trimmed
}

/// Decode a base64 PNG (optionally a data URL) and write it to `path`.
pub fn save_base64_png(encoded: &str, path: impl AsRef<Path>) -> FileResult<()> {
    let bytes = BASE64.decode(strip_data_url(encoded))?;
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
    img.save_with_format(path.as_ref(), ImageFormat::Png)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        width = img.width(),
        height = img.height(),
        "Saved PNG image"
    );
    Ok(())
}
