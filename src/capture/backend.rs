use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from the microphone capture path.
///
/// Permission refusal and backend failures are surfaced to the UI as a
/// retryable alert; they never tear down the session, which stays usable
/// for text input.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("another recording is already in progress")]
    AlreadyRecording,

    #[error("no recording in progress")]
    NotRecording,

    #[error("session no longer accepts recordings")]
    SessionClosed,

    #[error("audio backend error: {0}")]
    Backend(String),

    #[error("failed to write recording: {0}")]
    Io(#[from] std::io::Error),
}

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since recording started
    pub timestamp_ms: u64,
}

/// Microphone capture backend trait.
///
/// `start` requests microphone access; a refusal maps to
/// [`CaptureError::PermissionDenied`]. The returned channel closes when the
/// backend is stopped, which is how downstream writers learn the recording
/// ended.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start capturing audio.
    ///
    /// Returns a channel receiver that will receive audio frames.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError>;

    /// Stop capturing audio.
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Backend that produces no frames.
///
/// Used by text-only clients that still construct the full controller, and
/// by tests that only exercise recording lifecycle rather than audio
/// content.
pub struct NullBackend {
    sender: Option<mpsc::Sender<AudioFrame>>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self { sender: None }
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CaptureBackend for NullBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        let (tx, rx) = mpsc::channel(8);
        // Holding the sender keeps the channel open until stop().
        self.sender = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.sender = None;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.sender.is_some()
    }

    fn name(&self) -> &str {
        "null"
    }
}
