pub mod client;
pub mod protocol;
pub mod tts;

pub use client::{AgentClient, AgentError, HttpAgentClient};
pub use protocol::{
    parse_reply, AgentRequest, ChatMessage, CONNECT_FALLBACK_MESSAGE, PARSE_FALLBACK_MESSAGE,
};
pub use tts::{HttpTtsClient, SpeechClient};
