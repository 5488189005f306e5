#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::Message;
use super::Role;

pub const DEFAULT_SESSION_NAME: &str = "New Chat";
pub const SEED_GREETING: &str = "Hi! I'm Solendir, your company AI assistant.";

/// Longest placeholder name taken from the first message before a title
/// arrives.
const PLACEHOLDER_NAME_LENGTH: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub messages: Vec<Message>,
}

impl Default for Session {
    fn default() -> Session {
        return Session::new();
    }
}

impl Session {
    pub fn new() -> Session {
        return Session {
            id: Session::create_id(),
            name: DEFAULT_SESSION_NAME.to_string(),
            messages: vec![Message::new(Role::Assistant, SEED_GREETING)],
        };
    }

    pub fn create_id() -> String {
        return Uuid::new_v4()
            .to_string()
            .split('-')
            .enumerate()
            .filter_map(|(idx, str)| {
                if idx > 1 {
                    return None;
                }
                return Some(str);
            })
            .collect::<Vec<&str>>()
            .join("-");
    }

    pub fn placeholder_name(content: &str) -> String {
        let mut name = content
            .chars()
            .take(PLACEHOLDER_NAME_LENGTH)
            .collect::<String>();

        if content.chars().count() > PLACEHOLDER_NAME_LENGTH {
            name += "...";
        }

        return name;
    }

    /// Appends a message, naming the session after it when it is the first
    /// message following the seed greeting.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        if self.messages.len() == 2 {
            self.name = Session::placeholder_name(&self.messages[1].content);
        }
    }
}
