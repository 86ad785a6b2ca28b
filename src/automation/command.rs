//! Typed automation operations.
//!
//! Each variant fixes the endpoint and the exact set of payload keys it sends,
//! so no request can carry an undeclared argument.

use super::types::{Payload, Value};

/// One automation primitive with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomationCommand {
    Test,
    MouseMove { x: i64, y: i64 },
    Click { x: i64, y: i64 },
    MoveWheel { amt: i64 },
    SendText { x: i64, y: i64, text: String },
    Type { text: String },
    FindText { text: String },
    GetText { x: i64, y: i64, w: i64, h: i64 },
    FindImage { img: String },
    Screenshot,
    GetMouseColor { x: i64, y: i64 },
    GetMouse,
}

impl AutomationCommand {
    /// Path appended to the client's base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Test => "/test",
            Self::MouseMove { .. } => "/mousemove",
            Self::Click { .. } => "/click",
            Self::MoveWheel { .. } => "/movewheel",
            Self::SendText { .. } => "/sendtext",
            Self::Type { .. } => "/type",
            Self::FindText { .. } => "/findtext",
            Self::GetText { .. } => "/gettext",
            Self::FindImage { .. } => "/findimage",
            Self::Screenshot => "/screenshot",
            Self::GetMouseColor { .. } => "/getmousecolor",
            Self::GetMouse => "/getmouse",
        }
    }

    /// Build the request `data` map.
    pub fn payload(&self) -> Payload {
        let entries: Vec<(&str, Value)> = match self {
            Self::Test | Self::Screenshot | Self::GetMouse => Vec::new(),
            Self::MouseMove { x, y } | Self::Click { x, y } | Self::GetMouseColor { x, y } => {
                vec![("x", (*x).into()), ("y", (*y).into())]
            }
            Self::MoveWheel { amt } => vec![("amt", (*amt).into())],
            Self::SendText { x, y, text } => vec![
                ("x", (*x).into()),
                ("y", (*y).into()),
                ("text", text.as_str().into()),
            ],
            Self::Type { text } | Self::FindText { text } => {
                vec![("text", text.as_str().into())]
            }
            Self::GetText { x, y, w, h } => vec![
                ("x", (*x).into()),
                ("y", (*y).into()),
                ("w", (*w).into()),
                ("h", (*h).into()),
            ],
            Self::FindImage { img } => vec![("img", img.as_str().into())],
        };

        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}
