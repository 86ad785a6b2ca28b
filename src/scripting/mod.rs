//! Embedded scripting: the Rhai host and everything it exposes to scripts.

mod bindings;
mod host;
mod registry;

pub use bindings::{register_helpers, BindingContext};
pub use host::{ScriptError, ScriptHost, ScriptResult, AUTOMATION_GLOBAL, OUTPUT_GLOBAL};
pub use registry::{register_automation, AutomationHandle, HANDLE_TYPE_NAME};
