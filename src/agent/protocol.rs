use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transcript::{Speaker, Transcript};

/// Substituted when a response unwraps cleanly but carries no usable
/// `message` field.
pub const PARSE_FALLBACK_MESSAGE: &str =
    "Sorry, I encountered an issue. Let's continue our lesson.";

/// Substituted when the agent request fails outright, so the conversation
/// always gains a visible agent turn.
pub const CONNECT_FALLBACK_MESSAGE: &str =
    "Sorry, I had trouble connecting. Please try again.";

/// One entry of the conversation history sent to the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Serialize the transcript as the ordered role/content history the
    /// agent expects. System turns are local bookkeeping and are excluded.
    pub fn from_transcript(transcript: &Transcript) -> Vec<ChatMessage> {
        transcript
            .turns()
            .iter()
            .filter_map(|turn| {
                let role = match turn.speaker {
                    Speaker::User => "user",
                    Speaker::Agent => "assistant",
                    Speaker::System => return None,
                };
                Some(ChatMessage {
                    role: role.to_string(),
                    content: turn.text.clone(),
                })
            })
            .collect()
    }
}

/// Request body for the conversational-agent boundary.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRequest {
    /// Typed user input, or the opening instruction for the initial turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Base64-encoded recorded audio, forwarded as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,

    /// Container format of the audio payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Whether the agent should return synthesized audio inline
    pub tts: bool,

    /// Prior conversation as an ordered role/content list
    pub messages: Vec<ChatMessage>,

    /// Selected dialect identifier
    pub dialect: String,

    /// Lesson or custom tutoring context
    pub context: String,

    #[serde(rename = "isSimulation")]
    pub is_simulation: bool,

    #[serde(rename = "isInitial", skip_serializing_if = "Option::is_none")]
    pub is_initial: Option<bool>,
}

/// Extract the reply text from a raw agent response.
///
/// The boundary may wrap its JSON body in one or more `{ "body": "<json>" }`
/// proxy envelopes; unwrap until a `message` field appears. A response with
/// no usable message resolves to the fixed fallback rather than an error.
pub fn parse_reply(raw: Value) -> String {
    let mut data = raw;
    loop {
        let inner = match data.get("body").and_then(Value::as_str) {
            Some(body) => match serde_json::from_str::<Value>(body) {
                Ok(inner) => inner,
                Err(_) => break,
            },
            None => break,
        };
        data = inner;
    }

    match data.get("message").and_then(Value::as_str) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => PARSE_FALLBACK_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_message_passes_through() {
        assert_eq!(parse_reply(json!({ "message": "hello" })), "hello");
    }

    #[test]
    fn single_envelope_is_unwrapped() {
        let raw = json!({ "body": "{\"message\":\"hi\"}" });
        assert_eq!(parse_reply(raw), "hi");
    }

    #[test]
    fn double_envelope_is_unwrapped() {
        let raw = json!({ "body": "{\"body\":\"{\\\"message\\\":\\\"hi\\\"}\"}" });
        assert_eq!(parse_reply(raw), "hi");
    }

    #[test]
    fn missing_message_yields_fallback() {
        assert_eq!(parse_reply(json!({ "status": "ok" })), PARSE_FALLBACK_MESSAGE);
    }

    #[test]
    fn unparseable_body_yields_fallback() {
        let raw = json!({ "body": "not json at all" });
        assert_eq!(parse_reply(raw), PARSE_FALLBACK_MESSAGE);
    }

    #[test]
    fn empty_message_yields_fallback() {
        assert_eq!(parse_reply(json!({ "message": "" })), PARSE_FALLBACK_MESSAGE);
    }

    #[test]
    fn request_serializes_wire_field_names() {
        let request = AgentRequest {
            text: Some("marhaba".to_string()),
            audio: None,
            format: None,
            tts: true,
            messages: vec![],
            dialect: "egyptian".to_string(),
            context: String::new(),
            is_simulation: false,
            is_initial: Some(true),
        };

        let json = serde_json::to_string(&request).expect("serialize");
        assert!(json.contains("\"isSimulation\":false"));
        assert!(json.contains("\"isInitial\":true"));
        assert!(!json.contains("audio"));
    }

    #[test]
    fn history_excludes_system_turns() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        transcript.push_agent("hello");
        transcript.push_system("lesson complete");

        let messages = ChatMessage::from_transcript(&transcript);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[1].role, "assistant");
    }
}
