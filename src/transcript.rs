use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text of the synthetic system turn appended when a lesson is detected as
/// finished.
pub const LESSON_COMPLETE_TEXT: &str =
    "\u{1F389} Lesson complete! You've successfully finished this lesson.";

/// Identifier for a single turn, monotonic in creation order within one
/// transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurnId(pub u64);

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Agent,
    System,
}

/// One utterance in the conversation.
///
/// `text` is fixed at creation. `audio` starts absent and may be attached
/// once, and only to agent turns, when synthesized speech arrives later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub speaker: Speaker,
    pub text: String,
    pub audio: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}

/// Ordered, append-only record of one session's conversation.
///
/// Lives only as long as the session; nothing here is persisted.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> Turn {
        let turn = Turn {
            id: TurnId(self.next_id),
            speaker,
            text: text.into(),
            audio: None,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.turns.push(turn.clone());
        turn
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> Turn {
        self.push(Speaker::User, text)
    }

    pub fn push_agent(&mut self, text: impl Into<String>) -> Turn {
        self.push(Speaker::Agent, text)
    }

    pub fn push_system(&mut self, text: impl Into<String>) -> Turn {
        self.push(Speaker::System, text)
    }

    /// Attach synthesized audio to an existing agent turn.
    ///
    /// Returns `false` without modifying anything when the turn does not
    /// exist, is not an agent turn, or already carries audio.
    pub fn attach_audio(&mut self, id: TurnId, audio: Vec<u8>) -> bool {
        match self.turns.iter_mut().find(|t| t.id == id) {
            Some(turn) if turn.speaker == Speaker::Agent && turn.audio.is_none() => {
                turn.audio = Some(audio);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: TurnId) -> Option<&Turn> {
        self.turns.iter().find(|t| t.id == id)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut transcript = Transcript::new();
        let a = transcript.push_user("hi");
        let b = transcript.push_agent("hello");
        let c = transcript.push_system(LESSON_COMPLETE_TEXT);
        assert!(a.id < b.id);
        assert!(b.id < c.id);
    }

    #[test]
    fn audio_attaches_once_and_only_to_agent_turns() {
        let mut transcript = Transcript::new();
        let user = transcript.push_user("hi");
        let agent = transcript.push_agent("hello");

        assert!(!transcript.attach_audio(user.id, vec![1, 2, 3]));
        assert!(transcript.attach_audio(agent.id, vec![1, 2, 3]));
        assert!(!transcript.attach_audio(agent.id, vec![4, 5, 6]));

        let stored = transcript.get(agent.id).unwrap();
        assert_eq!(stored.audio.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn attach_to_unknown_turn_is_rejected() {
        let mut transcript = Transcript::new();
        assert!(!transcript.attach_audio(TurnId(99), vec![0; 4]));
    }
}
