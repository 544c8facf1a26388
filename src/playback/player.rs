use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::sink::{PlaybackSink, SoundHandle};
use crate::transcript::TurnId;

/// Payloads shorter than this are treated as malformed network responses
/// and skipped silently.
pub const MIN_PLAYABLE_BYTES: usize = 100;

/// Force-clears the now-playing indicator when a sink never reports
/// completion, so the UI cannot get stuck showing a playing state.
const SAFETY_TIMEOUT: Duration = Duration::from_secs(30);

struct ActivePlayback {
    handle: SoundHandle,
    watcher: JoinHandle<()>,
}

/// Owns the single active playback handle.
///
/// Every `play` call tears down the previous sound before starting the
/// next, so at most one sound is ever audible. A watch channel publishes
/// which turn is currently sounding for per-turn UI indicators.
pub struct PlaybackManager {
    sink: Arc<dyn PlaybackSink>,
    visibility: watch::Receiver<bool>,
    active: Mutex<Option<ActivePlayback>>,
    now_playing: Arc<watch::Sender<Option<TurnId>>>,
    generation: Arc<AtomicU64>,
}

impl PlaybackManager {
    pub fn new(sink: Arc<dyn PlaybackSink>, visibility: watch::Receiver<bool>) -> Self {
        let (now_playing, _) = watch::channel(None);
        Self {
            sink,
            visibility,
            active: Mutex::new(None),
            now_playing: Arc::new(now_playing),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to the id of the turn currently sounding, if any.
    pub fn now_playing(&self) -> watch::Receiver<Option<TurnId>> {
        self.now_playing.subscribe()
    }

    /// Play an encoded audio payload attributed to `turn_id`.
    ///
    /// No-op when the payload is implausibly small or the session is not
    /// visible. Pre-empts any active sound first.
    pub async fn play(&self, audio: Vec<u8>, turn_id: TurnId) -> Result<()> {
        if audio.len() < MIN_PLAYABLE_BYTES {
            debug!(%turn_id, bytes = audio.len(), "skipping implausibly small audio payload");
            return Ok(());
        }
        if !*self.visibility.borrow() {
            debug!(%turn_id, "session not visible, skipping playback");
            return Ok(());
        }

        let mut active = self.active.lock().await;
        Self::teardown(&mut active, &self.now_playing);

        let mut handle = self.sink.start(audio).await?;
        let finished = handle.take_finished();

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.now_playing.send_replace(Some(turn_id));
        debug!(%turn_id, sink = self.sink.name(), "playback started");

        let now_playing = Arc::clone(&self.now_playing);
        let generation_counter = Arc::clone(&self.generation);
        let watcher = tokio::spawn(async move {
            match finished {
                Some(finished) => {
                    tokio::select! {
                        _ = finished => {}
                        _ = tokio::time::sleep(SAFETY_TIMEOUT) => {
                            warn!(%turn_id, "no completion event within safety timeout");
                        }
                    }
                }
                None => tokio::time::sleep(SAFETY_TIMEOUT).await,
            }
            // Only clear if no newer sound replaced this one in the meantime.
            if generation_counter.load(Ordering::SeqCst) == generation {
                now_playing.send_replace(None);
            }
        });

        *active = Some(ActivePlayback { handle, watcher });
        Ok(())
    }

    /// Stop and release any active sound. Idempotent and safe from any
    /// teardown path (unmount, visibility loss, explicit user action).
    pub async fn stop_all(&self) {
        let mut active = self.active.lock().await;
        Self::teardown(&mut active, &self.now_playing);
    }

    fn teardown(
        slot: &mut Option<ActivePlayback>,
        now_playing: &Arc<watch::Sender<Option<TurnId>>>,
    ) {
        if let Some(mut playback) = slot.take() {
            playback.watcher.abort();
            playback.handle.stop();
        }
        now_playing.send_replace(None);
    }
}
