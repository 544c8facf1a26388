pub mod completion;
pub mod config;
pub mod context;
pub mod controller;
pub mod exchange;

pub use completion::is_completion_reply;
pub use config::{LessonRef, SessionOptions};
pub use context::{lesson_context, opening_instruction, resolve_context};
pub use controller::{RecordingResult, SessionController};
pub use exchange::{SendOutcome, SessionEvent, TurnExchange, TurnInput};
