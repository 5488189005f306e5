use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Assistant;
use crate::domain::models::AssistantError;

/// Assistant answering from a fixed script and recording what it was sent.
#[derive(Default)]
pub struct ScriptedAssistant {
    replies: Mutex<VecDeque<Result<String, AssistantError>>>,
    asked: Mutex<Vec<String>>,
    tokens: Mutex<Vec<String>>,
}

impl ScriptedAssistant {
    pub fn replying(replies: Vec<Result<String, AssistantError>>) -> ScriptedAssistant {
        return ScriptedAssistant {
            replies: Mutex::new(replies.into()),
            ..ScriptedAssistant::default()
        };
    }

    pub fn asked(&self) -> Vec<String> {
        return self.asked.lock().unwrap().clone();
    }

    pub fn tokens(&self) -> Vec<String> {
        return self.tokens.lock().unwrap().clone();
    }
}

#[async_trait]
impl Assistant for ScriptedAssistant {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn ask(&self, text: &str) -> Result<String, AssistantError> {
        self.asked.lock().unwrap().push(text.to_string());
        return self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| return Ok("".to_string()));
    }

    #[allow(clippy::implicit_return)]
    async fn configure_notion(&self, token: &str) -> Result<()> {
        self.tokens.lock().unwrap().push(token.to_string());
        return Ok(());
    }
}
