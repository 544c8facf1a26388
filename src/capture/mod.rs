pub mod backend;
pub mod gesture;
pub mod recorder;

pub use backend::{AudioFrame, CaptureBackend, CaptureError, NullBackend};
pub use gesture::{CancelGesture, DEFAULT_CANCEL_THRESHOLD};
pub use recorder::{Recorder, RecorderConfig, RecordingOutcome};
