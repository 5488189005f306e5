use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssistantError {
    #[error("failed to communicate with the assistant backend: {0}")]
    Communication(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> AssistantError {
        return AssistantError::Communication(err.to_string());
    }
}

#[async_trait]
pub trait Assistant {
    /// Used at startup to check the backend is reachable. A failure is only
    /// reported in the status line, chatting is still possible.
    async fn health_check(&self) -> Result<()>;

    /// Sends a single message and returns the full reply. There are no
    /// retries and no streaming, the reply is returned whole or the call
    /// fails with `AssistantError::Communication`.
    async fn ask(&self, text: &str) -> Result<String, AssistantError>;

    /// Hands the Notion credential to the backend so it can pull workspace
    /// context into replies. The response is not inspected.
    async fn configure_notion(&self, token: &str) -> Result<()>;
}

pub type AssistantBox = Arc<dyn Assistant + Send + Sync>;
