use std::time::Duration;

use anyhow::Context;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Base64 payloads under this length cannot be real speech audio.
const MIN_AUDIO_B64_LEN: usize = 100;

/// Text-to-speech boundary.
///
/// `None` always means "proceed without audio for this turn", never a
/// fatal condition: TTS failures are silent by design.
#[async_trait::async_trait]
pub trait SpeechClient: Send + Sync {
    async fn fetch_speech(&self, text: &str) -> Option<Vec<u8>>;
}

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

#[derive(Debug, Deserialize)]
struct TtsResponse {
    audio: String,
}

/// HTTP implementation of the TTS boundary.
pub struct HttpTtsClient {
    url: String,
    voice: String,
    client: reqwest::Client,
}

impl HttpTtsClient {
    pub fn new(
        url: impl Into<String>,
        voice: impl Into<String>,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client for TTS boundary")?;

        Ok(Self {
            url: url.into(),
            voice: voice.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl SpeechClient for HttpTtsClient {
    async fn fetch_speech(&self, text: &str) -> Option<Vec<u8>> {
        debug!(chars = text.len(), "requesting speech synthesis");

        let request = TtsRequest {
            text,
            voice: &self.voice,
        };

        let response = match self.client.post(&self.url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("TTS request failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "TTS request rejected");
            return None;
        }

        let body: TtsResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("failed to parse TTS response: {e}");
                return None;
            }
        };

        if body.audio.len() < MIN_AUDIO_B64_LEN {
            warn!(len = body.audio.len(), "TTS payload too short, ignoring");
            return None;
        }

        match base64::engine::general_purpose::STANDARD.decode(&body.audio) {
            Ok(audio) => {
                debug!(bytes = audio.len(), "speech synthesis received");
                Some(audio)
            }
            Err(e) => {
                warn!("TTS payload is not valid base64: {e}");
                None
            }
        }
    }
}
