//! Prompt templates and model selection.

mod models;
mod template;

pub use models::{resolve_model, DEFAULT_MODEL};
pub use template::{clean_output, load_template, render_prompt};
