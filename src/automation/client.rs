//! HTTP client for the automation service.

use thiserror::Error;
use uuid::Uuid;

use super::command::AutomationCommand;
use super::types::{CommandRequest, Point};

#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("error marshalling JSON: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("error making HTTP request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("error decoding JSON response: {0}")]
    Decode(String),
}

pub type AutomationResult<T> = Result<T, AutomationError>;

/// Issues one POST per automation primitive against `base_url + endpoint`.
///
/// Nothing is retried and no timeout is set: a call waits for the remote side
/// until it answers or the transport fails.
#[derive(Debug, Clone)]
pub struct AutomationClient {
    base_url: String,
    http: reqwest::Client,
}

impl AutomationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post `request` to `endpoint` and decode the response envelope.
    pub async fn call(&self, endpoint: &str, request: &CommandRequest) -> AutomationResult<Point> {
        let url = format!("{}{}", self.base_url, endpoint);
        let body = serde_json::to_vec(request).map_err(AutomationError::Serialization)?;

        tracing::debug!(url = %url, id = %request.id, "Calling automation endpoint");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| AutomationError::Decode(e.to_string()))
    }

    /// Run a typed command.
    pub async fn execute(&self, command: &AutomationCommand) -> AutomationResult<Point> {
        let request = CommandRequest::new(Uuid::new_v4().to_string(), command.payload());
        self.call(command.endpoint(), &request).await
    }

    /// Probe the service via `/test`.
    pub async fn test(&self) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::Test).await
    }

    pub async fn mouse_move(&self, x: i64, y: i64) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::MouseMove { x, y }).await
    }

    pub async fn click(&self, x: i64, y: i64) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::Click { x, y }).await
    }

    pub async fn move_wheel(&self, amt: i64) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::MoveWheel { amt }).await
    }

    pub async fn send_text(&self, x: i64, y: i64, text: &str) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::SendText {
            x,
            y,
            text: text.to_string(),
        })
        .await
    }

    pub async fn type_text(&self, text: &str) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::Type {
            text: text.to_string(),
        })
        .await
    }

    pub async fn find_text(&self, text: &str) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::FindText {
            text: text.to_string(),
        })
        .await
    }

    pub async fn get_text(&self, x: i64, y: i64, w: i64, h: i64) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::GetText { x, y, w, h }).await
    }

    pub async fn find_image(&self, img: &str) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::FindImage {
            img: img.to_string(),
        })
        .await
    }

    pub async fn screenshot(&self) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::Screenshot).await
    }

    pub async fn get_mouse_color(&self, x: i64, y: i64) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::GetMouseColor { x, y }).await
    }

    pub async fn get_mouse(&self) -> AutomationResult<Point> {
        self.execute(&AutomationCommand::GetMouse).await
    }
}
