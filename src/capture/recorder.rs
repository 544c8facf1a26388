use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::backend::{CaptureBackend, CaptureError};

/// Configuration for the recorder
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Directory where finished recordings are written
    pub output_dir: PathBuf,
    /// Recordings stopped normally under this duration are discarded
    pub min_duration_secs: u64,
    /// Sample rate of the written WAV file
    pub sample_rate: u32,
    /// Channel count of the written WAV file
    pub channels: u16,
}

impl RecorderConfig {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            min_duration_secs: 10,
            sample_rate: 16000,
            channels: 1,
        }
    }
}

/// Result of finishing a recording.
#[derive(Debug)]
pub enum RecordingOutcome {
    /// Recording finalized; the file at `path` is ready to transmit.
    Completed { path: PathBuf, elapsed_secs: u64 },
    /// Explicitly cancelled by the caller. No notice is shown.
    Cancelled,
    /// Stopped normally but under the minimum duration. The caller surfaces
    /// a "recording too short" notice and transmits nothing.
    TooShort { elapsed_secs: u64 },
}

struct ActiveRecording {
    started_at: tokio::time::Instant,
    elapsed_secs: Arc<AtomicU64>,
    tick_task: JoinHandle<()>,
    writer_task: JoinHandle<Result<PathBuf, CaptureError>>,
}

/// Owns the microphone recording lifecycle: at most one recording session
/// exists at a time, a 1-second tick exposes elapsed time while recording,
/// and finishing distinguishes cancel, too-short, and completed outcomes.
pub struct Recorder {
    config: RecorderConfig,
    backend: Box<dyn CaptureBackend>,
    active: Option<ActiveRecording>,
}

impl Recorder {
    pub fn new(backend: Box<dyn CaptureBackend>, config: RecorderConfig) -> Self {
        Self {
            config,
            backend,
            active: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Elapsed seconds of the in-progress recording, updated once per second.
    pub fn elapsed_secs(&self) -> u64 {
        self.active
            .as_ref()
            .map(|a| a.elapsed_secs.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Start a new recording session.
    ///
    /// Fails with [`CaptureError::AlreadyRecording`] when one is active and
    /// with [`CaptureError::PermissionDenied`] when the backend cannot get
    /// microphone access.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.active.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        let mut frames = self.backend.start().await?;
        info!(backend = self.backend.name(), "recording started");

        fs::create_dir_all(&self.config.output_dir)?;
        let path = self
            .config
            .output_dir
            .join(format!("recording-{}.wav", uuid::Uuid::new_v4()));

        let spec = hound::WavSpec {
            channels: self.config.channels,
            sample_rate: self.config.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let writer_path = path.clone();
        let writer_task = tokio::spawn(async move {
            let mut writer = hound::WavWriter::create(&writer_path, spec)
                .map_err(|e| CaptureError::Backend(format!("failed to create WAV file: {e}")))?;

            while let Some(frame) = frames.recv().await {
                // The file header is fixed at creation; frames in another
                // format would be silently mislabeled, so reject them.
                if frame.sample_rate != spec.sample_rate || frame.channels != spec.channels {
                    return Err(CaptureError::Backend(format!(
                        "backend produced {} Hz/{} ch frames, expected {} Hz/{} ch",
                        frame.sample_rate, frame.channels, spec.sample_rate, spec.channels
                    )));
                }
                for &sample in &frame.samples {
                    writer
                        .write_sample(sample)
                        .map_err(|e| CaptureError::Backend(format!("WAV write failed: {e}")))?;
                }
            }

            writer
                .finalize()
                .map_err(|e| CaptureError::Backend(format!("WAV finalize failed: {e}")))?;
            Ok(writer_path)
        });

        let elapsed_secs = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&elapsed_secs);
        let tick_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            ticker.tick().await; // first tick completes immediately
            loop {
                ticker.tick().await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        self.active = Some(ActiveRecording {
            started_at: tokio::time::Instant::now(),
            elapsed_secs,
            tick_task,
            writer_task,
        });

        Ok(())
    }

    /// Stop the active recording.
    ///
    /// `cancelled` reflects the caller's gesture state: a cancelled
    /// recording is always discarded regardless of its duration, while a
    /// normal stop under the configured minimum yields
    /// [`RecordingOutcome::TooShort`].
    pub async fn finish(&mut self, cancelled: bool) -> Result<RecordingOutcome, CaptureError> {
        let recording = self.active.take().ok_or(CaptureError::NotRecording)?;
        recording.tick_task.abort();

        // Stopping the backend closes the frame channel, letting the writer
        // drain remaining frames and finalize the file.
        self.backend.stop().await?;

        let path = recording
            .writer_task
            .await
            .map_err(|e| CaptureError::Backend(format!("writer task failed: {e}")))??;

        let elapsed_secs = recording.started_at.elapsed().as_secs();

        if cancelled {
            info!(elapsed_secs, "recording cancelled");
            discard(&path);
            return Ok(RecordingOutcome::Cancelled);
        }

        if elapsed_secs < self.config.min_duration_secs {
            info!(
                elapsed_secs,
                min = self.config.min_duration_secs,
                "recording too short, discarding"
            );
            discard(&path);
            return Ok(RecordingOutcome::TooShort { elapsed_secs });
        }

        info!(elapsed_secs, path = %path.display(), "recording finished");
        Ok(RecordingOutcome::Completed { path, elapsed_secs })
    }
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), "failed to remove discarded recording: {e}");
    }
}
