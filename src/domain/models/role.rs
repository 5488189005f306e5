use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Name shown above a chat bubble.
    pub fn display_name(&self) -> String {
        match self {
            Role::User => {
                let username = Config::get(ConfigKey::Username);
                if username.is_empty() {
                    return "You".to_string();
                }
                return username;
            }
            Role::Assistant => return "Solendir".to_string(),
        }
    }
}
