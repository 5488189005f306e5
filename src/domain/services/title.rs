#[cfg(test)]
#[path = "title_test.rs"]
mod tests;

use crate::domain::models::Assistant;
use crate::domain::models::AssistantError;
use crate::domain::models::Message;
use crate::domain::models::DEFAULT_SESSION_NAME;

const TITLE_MAX_LENGTH: usize = 40;

pub struct TitleGenerator {}

impl TitleGenerator {
    pub fn prompt(exchange: &[Message]) -> String {
        let conversation = exchange
            .iter()
            .map(|message| {
                return format!("{}: {}", message.role, message.content);
            })
            .collect::<Vec<String>>()
            .join("\n");

        return format!("Given the following conversation, generate a short, relevant chat title (max 6 words):\n\n{conversation}\n\nTitle:");
    }

    pub fn sanitize(response: &str) -> String {
        let title = response
            .replace('\n', "")
            .chars()
            .take(TITLE_MAX_LENGTH)
            .collect::<String>();

        if title.trim().is_empty() {
            return DEFAULT_SESSION_NAME.to_string();
        }

        return title;
    }

    /// Asks the assistant to name a conversation from its first exchange.
    pub async fn summarize<A>(assistant: &A, exchange: &[Message]) -> Result<String, AssistantError>
    where
        A: Assistant + ?Sized,
    {
        let response = assistant.ask(&TitleGenerator::prompt(exchange)).await?;
        return Ok(TitleGenerator::sanitize(&response));
    }
}
