//! Remote automation service: wire types, typed commands and the HTTP client.

mod client;
mod command;
mod types;

pub use client::{AutomationClient, AutomationError, AutomationResult};
pub use command::AutomationCommand;
pub use types::{CommandRequest, Payload, Point, Value};
