//! Lesson-completion detection over agent reply text.
//!
//! Substring matching on natural language is a known-fuzzy heuristic the
//! product relies on; it is isolated here so a structured signal can
//! replace it without touching the exchange protocol.

/// Phrases an agent reply may contain to announce lesson completion.
const COMPLETION_PHRASES: [&str; 3] = [
    "lesson complete",
    "completed this lesson",
    "you have completed this lesson",
];

/// Whether a reply looks like a completion announcement. Case-insensitive.
pub fn is_completion_reply(text: &str) -> bool {
    let lower = text.to_lowercase();
    COMPLETION_PHRASES.iter().any(|phrase| lower.contains(phrase))
}
