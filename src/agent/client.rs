use std::time::Duration;

use anyhow::Context;
use thiserror::Error;
use tracing::debug;

use super::protocol::{parse_reply, AgentRequest};

/// Errors from the conversational-agent boundary.
///
/// The exchange layer never lets these escape to the UI; they are absorbed
/// into a fallback agent turn.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("agent returned status {0}")]
    Status(u16),
}

/// Conversational-agent boundary: conversation history plus context in,
/// reply text out.
#[async_trait::async_trait]
pub trait AgentClient: Send + Sync {
    async fn send(&self, request: &AgentRequest) -> Result<String, AgentError>;
}

/// HTTP implementation of the agent boundary.
pub struct HttpAgentClient {
    url: String,
    client: reqwest::Client,
}

impl HttpAgentClient {
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client for agent boundary")?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl AgentClient for HttpAgentClient {
    async fn send(&self, request: &AgentRequest) -> Result<String, AgentError> {
        debug!(
            history_len = request.messages.len(),
            has_audio = request.audio.is_some(),
            "sending agent request"
        );

        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Status(status.as_u16()));
        }

        let raw: serde_json::Value = response.json().await?;
        Ok(parse_reply(raw))
    }
}
