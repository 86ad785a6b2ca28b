//! Script host: one interpreter and one global scope for the whole process.

use std::path::{Path, PathBuf};

use rhai::{Engine, Scope};
use thiserror::Error;

use super::bindings::{register_helpers, BindingContext};
use super::registry::{register_automation, AutomationHandle};

/// Global holding the LLM completion for the post-completion script.
pub const OUTPUT_GLOBAL: &str = "output";

/// Global holding an `APIClient` bound to the configured automation service.
pub const AUTOMATION_GLOBAL: &str = "automation";

/// A script failed to load or run. Always fatal to the caller.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("script error: {0}")]
    Eval(String),
}

pub type ScriptResult<T> = Result<T, ScriptError>;

/// Owns the interpreter and the scope that persists between script runs.
///
/// Variables declared at the top level of one script stay visible to later
/// scripts run through the same host.
///
/// # Panics
///
/// Bindings block on the runtime handle they were built with, so running a
/// script from inside an async task panics. Call from a plain thread.
pub struct ScriptHost {
    engine: Engine,
    scope: Scope<'static>,
}

impl ScriptHost {
    /// Build the interpreter and register every binding.
    pub fn new(ctx: BindingContext, automation_url: &str) -> Self {
        let mut engine = Engine::new();
        register_automation(&mut engine, ctx.runtime.clone());

        let mut scope = Scope::new();
        scope.push(
            AUTOMATION_GLOBAL,
            AutomationHandle::new(automation_url, ctx.runtime.clone()),
        );

        register_helpers(&mut engine, ctx);

        tracing::debug!(automation_url, "Script host initialized");
        Self { engine, scope }
    }

    /// Run script source against the shared scope.
    pub fn run_script(&mut self, source: &str) -> ScriptResult<()> {
        self.engine
            .run_with_scope(&mut self.scope, source)
            .map_err(|e| ScriptError::Eval(e.to_string()))
    }

    /// Read and run a script file.
    pub fn run_file(&mut self, path: &Path) -> ScriptResult<()> {
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(script = %path.display(), "Running script");
        self.run_script(&source)
    }

    /// Publish the completion text as the `output` global.
    pub fn set_output(&mut self, output: &str) {
        self.scope.set_value(OUTPUT_GLOBAL, output.to_string());
    }

    /// Read a global as a string, if it holds one.
    pub fn global_string(&self, name: &str) -> Option<String> {
        self.scope.get_value::<String>(name)
    }
}
