pub mod agent;
pub mod capture;
pub mod config;
pub mod playback;
pub mod profile;
pub mod progress;
pub mod session;
pub mod transcript;

pub use agent::{AgentClient, AgentError, AgentRequest, ChatMessage, HttpAgentClient, HttpTtsClient, SpeechClient};
pub use capture::{
    AudioFrame, CancelGesture, CaptureBackend, CaptureError, NullBackend, Recorder,
    RecorderConfig, RecordingOutcome,
};
pub use config::Config;
pub use playback::{AudioGate, NullGate, NullSink, PlaybackManager, PlaybackSink, RodioSink};
pub use profile::{Dialect, Identity, InMemoryProfile, ProfileStore};
pub use progress::{LessonProgress, NullProgress};
pub use session::{
    LessonRef, RecordingResult, SendOutcome, SessionController, SessionEvent, SessionOptions,
    TurnExchange, TurnInput,
};
pub use transcript::{Speaker, Transcript, Turn, TurnId};
