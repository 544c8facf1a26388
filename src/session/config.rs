use crate::profile::Dialect;

/// The lesson a practice session is working toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonRef {
    pub lesson_id: u32,
    pub unit_id: u32,
}

/// Options for one practice session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Unique session identifier
    pub session_id: String,

    /// Target lesson; `None` for free-form practice
    pub lesson: Option<LessonRef>,

    /// Selected dialect, sent with every agent request
    pub dialect: Dialect,

    /// Caller-supplied tutoring context overriding the lesson curriculum
    pub custom_context: Option<String>,

    /// Simulation sessions never evaluate lesson completion
    pub is_simulation: bool,

    /// Whether agent replies get synthesized speech
    pub tts_enabled: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            session_id: format!("practice-{}", uuid::Uuid::new_v4()),
            lesson: None,
            dialect: Dialect::default(),
            custom_context: None,
            is_simulation: false,
            tts_enabled: true,
        }
    }
}

impl SessionOptions {
    pub fn for_lesson(lesson_id: u32, unit_id: u32) -> Self {
        Self {
            lesson: Some(LessonRef { lesson_id, unit_id }),
            ..Self::default()
        }
    }

    pub fn simulation() -> Self {
        Self {
            is_simulation: true,
            ..Self::default()
        }
    }
}
