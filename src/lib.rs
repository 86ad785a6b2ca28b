//! # prompt-pilot
//!
//! Render a prompt template, complete it with a local LLM, and optionally hand
//! the completion to a script that can drive a remote automation service.
//!
//! This library provides:
//! - A typed HTTP client for the automation service (mouse, keyboard, screen)
//! - An embedded Rhai host exposing that client and prompt helpers to scripts
//! - Prompt template rendering and a streaming Ollama completion client
//!
//! ## Flow
//!
//! 1. Build the script host and run the bootstrap script
//! 2. Render the selected template with context and command text
//! 3. Stream the completion from the LLM runtime
//! 4. Publish the completion as `output` and run the post-completion script
//!
//! ## Example
//!
//! ```text
//! let api = APIClient("http://localhost:8080/api");
//! let pos = api.findtext("OK");
//! if type_of(pos) == "string" {
//!     print(pos);
//! } else {
//!     api.click(pos[0], pos[1]);
//! }
//! ```

pub mod automation;
pub mod config;
pub mod files;
pub mod llm;
pub mod prompt;
pub mod scripting;

pub use config::Config;
