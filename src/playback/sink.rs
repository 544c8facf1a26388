use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::oneshot;
use tracing::warn;

/// Handle to a sound a [`PlaybackSink`] has started.
///
/// Dropping the handle stops the sound; `stop` does so explicitly. The
/// finished receiver fires once on natural completion.
pub struct SoundHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    finished_rx: Option<oneshot::Receiver<()>>,
}

impl SoundHandle {
    pub fn new(stop_tx: oneshot::Sender<()>, finished_rx: oneshot::Receiver<()>) -> Self {
        Self {
            stop_tx: Some(stop_tx),
            finished_rx: Some(finished_rx),
        }
    }

    /// Request the sound stop. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Take the completion receiver. Returns `None` after the first call.
    pub fn take_finished(&mut self) -> Option<oneshot::Receiver<()>> {
        self.finished_rx.take()
    }
}

/// Audio output seam.
///
/// Implementations start decoding/playing the encoded payload and report
/// completion through the returned handle. The manager layers the
/// at-most-one-sound policy on top; sinks only play what they are given.
#[async_trait::async_trait]
pub trait PlaybackSink: Send + Sync {
    async fn start(&self, audio: Vec<u8>) -> Result<SoundHandle>;

    /// Get sink name for logging
    fn name(&self) -> &str;
}

/// Process-wide audio enablement.
///
/// The platform audio service can be left in an inconsistent state by
/// abrupt teardown, so the session controller disables it before forceful
/// stops and re-enables it after a short grace delay. Only the controller
/// toggles this; sub-managers receive it as an injected capability.
pub trait AudioGate: Send + Sync {
    fn set_enabled(&self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

/// Gate for platforms with no global audio toggle. Tracks the flag so the
/// controller's sequencing is still observable in tests.
pub struct NullGate {
    enabled: AtomicBool,
}

impl NullGate {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }
}

impl Default for NullGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioGate for NullGate {
    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

/// Sink that plays through the default output device via rodio.
///
/// Each sound runs on its own blocking thread because the rodio output
/// stream is not `Send`; control flows through the handle's channels.
pub struct RodioSink;

impl RodioSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PlaybackSink for RodioSink {
    async fn start(&self, audio: Vec<u8>) -> Result<SoundHandle> {
        let (stop_tx, stop_rx) = oneshot::channel();
        let (finished_tx, finished_rx) = oneshot::channel();

        std::thread::spawn(move || {
            play_blocking(audio, stop_rx, finished_tx);
        });

        Ok(SoundHandle::new(stop_tx, finished_rx))
    }

    fn name(&self) -> &str {
        "rodio"
    }
}

fn play_blocking(audio: Vec<u8>, mut stop_rx: oneshot::Receiver<()>, finished_tx: oneshot::Sender<()>) {
    let (_stream, handle) = match rodio::OutputStream::try_default() {
        Ok(out) => out,
        Err(e) => {
            warn!("no audio output device available: {e}");
            let _ = finished_tx.send(());
            return;
        }
    };

    let sink = match rodio::Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            warn!("failed to open playback sink: {e}");
            let _ = finished_tx.send(());
            return;
        }
    };

    match rodio::Decoder::new(std::io::Cursor::new(audio)) {
        Ok(source) => sink.append(source),
        Err(e) => {
            warn!("failed to decode audio payload: {e}");
            let _ = finished_tx.send(());
            return;
        }
    }

    loop {
        if sink.empty() {
            break;
        }
        match stop_rx.try_recv() {
            Ok(()) | Err(oneshot::error::TryRecvError::Closed) => {
                sink.stop();
                break;
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    let _ = finished_tx.send(());
}

/// Sink that discards audio and completes immediately. Used by text-only
/// clients and tests.
pub struct NullSink;

#[async_trait::async_trait]
impl PlaybackSink for NullSink {
    async fn start(&self, _audio: Vec<u8>) -> Result<SoundHandle> {
        let (stop_tx, _stop_rx) = oneshot::channel();
        let (finished_tx, finished_rx) = oneshot::channel();
        let _ = finished_tx.send(());
        Ok(SoundHandle::new(stop_tx, finished_rx))
    }

    fn name(&self) -> &str {
        "null"
    }
}
