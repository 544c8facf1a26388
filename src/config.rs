use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// Conversational-agent endpoint
    pub agent_url: String,
    /// Text-to-speech endpoint
    pub tts_url: String,
    /// TTS voice identifier
    pub voice: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub recordings_path: String,
    pub sample_rate: u32,
    pub channels: u16,
    /// Recordings stopped normally under this duration are discarded
    pub min_recording_secs: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                agent_url: "http://localhost:8787/voice".to_string(),
                tts_url: "http://localhost:8787/tts".to_string(),
                voice: "nova".to_string(),
                request_timeout_secs: 30,
            },
            audio: AudioConfig {
                recordings_path: "recordings".to_string(),
                sample_rate: 16000,
                channels: 1,
                min_recording_secs: 10,
            },
        }
    }
}
