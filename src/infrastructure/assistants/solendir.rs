#[cfg(test)]
#[path = "solendir_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Assistant;
use crate::domain::models::AssistantError;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    response: Option<serde_json::Value>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct NotionTokenRequest {
    token: String,
}

pub struct Solendir {
    url: String,
    timeout: String,
}

impl Default for Solendir {
    fn default() -> Solendir {
        return Solendir {
            url: Config::get(ConfigKey::BackendURL),
            timeout: Config::get(ConfigKey::BackendHealthCheckTimeout),
        };
    }
}

#[async_trait]
impl Assistant for Solendir {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        let res = reqwest::Client::new()
            .get(&self.url)
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Solendir backend is not running");
                bail!("Solendir backend is not running at {}", self.url);
            }
        };

        if res.status() != 200 {
            tracing::error!(
                status = res.status().as_u16(),
                "Solendir backend health check failed"
            );
            bail!("Solendir backend health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn ask(&self, text: &str) -> Result<String, AssistantError> {
        let req = ChatRequest {
            message: text.to_string(),
        };

        let res = reqwest::Client::new()
            .post(format!("{url}/chat", url = self.url))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to make chat request to Solendir"
            );
            return Err(AssistantError::Communication(format!(
                "backend responded with status {}",
                res.status().as_u16()
            )));
        }

        let body = res.json::<ChatResponse>().await?;
        tracing::debug!(body = ?body, "Chat response");

        // A reply without a usable `response` renders as an empty bubble.
        let reply = match body.response {
            Some(serde_json::Value::String(reply)) => reply,
            _ => "".to_string(),
        };

        return Ok(reply);
    }

    #[allow(clippy::implicit_return)]
    async fn configure_notion(&self, token: &str) -> Result<()> {
        let req = NotionTokenRequest {
            token: token.to_string(),
        };

        reqwest::Client::new()
            .post(format!("{url}/notion/token", url = self.url))
            .json(&req)
            .send()
            .await?;

        return Ok(());
    }
}
