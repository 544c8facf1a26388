use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{info, warn};

use super::config::SessionOptions;
use super::exchange::{SendOutcome, SessionEvent, TurnExchange, TurnInput};
use crate::agent::{AgentClient, SpeechClient};
use crate::capture::{CaptureBackend, CaptureError, Recorder, RecorderConfig, RecordingOutcome};
use crate::playback::{AudioGate, PlaybackManager, PlaybackSink};
use crate::progress::LessonProgress;
use crate::transcript::{Turn, TurnId};

/// Grace delay before re-enabling the audio subsystem after a forceful
/// teardown.
const AUDIO_REENABLE_GRACE: Duration = Duration::from_millis(300);

/// Result of finishing a recording at the session level.
#[derive(Debug)]
pub enum RecordingResult {
    /// Audio was transmitted as a user turn
    Sent(SendOutcome),
    /// Explicit cancel; nothing sent, no notice shown
    Cancelled,
    /// Stopped under the minimum duration; the caller surfaces a
    /// "recording too short" notice
    TooShort { elapsed_secs: u64 },
}

/// One practice conversation from mount to close.
///
/// Composes the recorder, the playback manager, and the turn exchange, and
/// owns the two things no sub-manager may touch on its own: session
/// visibility and the process-wide audio gate.
pub struct SessionController {
    options: SessionOptions,
    exchange: Arc<TurnExchange>,
    playback: Arc<PlaybackManager>,
    recorder: Mutex<Recorder>,
    gate: Arc<dyn AudioGate>,
    progress: Arc<dyn LessonProgress>,
    visibility: watch::Sender<bool>,
    started_at: chrono::DateTime<Utc>,
}

impl SessionController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        options: SessionOptions,
        agent: Arc<dyn AgentClient>,
        speech: Arc<dyn SpeechClient>,
        progress: Arc<dyn LessonProgress>,
        gate: Arc<dyn AudioGate>,
        sink: Arc<dyn PlaybackSink>,
        backend: Box<dyn CaptureBackend>,
        recorder_config: RecorderConfig,
        visible: bool,
    ) -> Arc<Self> {
        let (visibility, _) = watch::channel(visible);

        let playback = Arc::new(PlaybackManager::new(sink, visibility.subscribe()));
        let exchange = TurnExchange::new(
            agent,
            speech,
            Arc::clone(&playback),
            Arc::clone(&progress),
            options.clone(),
            visibility.subscribe(),
        );

        Arc::new(Self {
            options,
            exchange,
            playback,
            recorder: Mutex::new(Recorder::new(backend, recorder_config)),
            gate,
            progress,
            visibility,
            started_at: Utc::now(),
        })
    }

    /// Start the session: enable audio and request the agent's opening
    /// turn (only if the transcript is empty and the session is visible).
    pub async fn start(&self) -> SendOutcome {
        info!(session = %self.options.session_id, "starting practice session");
        self.gate.set_enabled(true);
        self.exchange.send_initial().await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.exchange.subscribe()
    }

    pub fn now_playing(&self) -> watch::Receiver<Option<TurnId>> {
        self.playback.now_playing()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.exchange.is_awaiting_reply()
    }

    pub fn is_lesson_complete(&self) -> bool {
        self.exchange.is_lesson_complete()
    }

    pub fn is_visible(&self) -> bool {
        *self.visibility.borrow()
    }

    pub async fn transcript_snapshot(&self) -> Vec<Turn> {
        self.exchange.transcript_snapshot().await
    }

    /// Send a typed user turn.
    pub async fn send_text(&self, text: &str) -> SendOutcome {
        self.exchange
            .send_user_turn(TurnInput::Text(text.to_string()))
            .await
    }

    /// Replay the stored audio of a turn, e.g. from a per-turn play button.
    pub async fn replay_turn(&self, turn_id: TurnId) -> bool {
        let audio = self
            .transcript_snapshot()
            .await
            .into_iter()
            .find(|t| t.id == turn_id)
            .and_then(|t| t.audio);
        match audio {
            Some(audio) => {
                if let Err(e) = self.playback.play(audio, turn_id).await {
                    warn!(%turn_id, "replay failed: {e}");
                    return false;
                }
                true
            }
            None => false,
        }
    }

    /// Stop any playback and start recording a voice turn.
    pub async fn start_recording(&self) -> Result<(), CaptureError> {
        if self.exchange.is_lesson_complete() {
            return Err(CaptureError::SessionClosed);
        }
        self.playback.stop_all().await;
        self.recorder.lock().await.start().await
    }

    pub async fn recording_elapsed_secs(&self) -> u64 {
        self.recorder.lock().await.elapsed_secs()
    }

    /// Finish the in-progress recording and, when it completed normally,
    /// transmit it as a voice turn.
    pub async fn finish_recording(&self, cancelled: bool) -> Result<RecordingResult, CaptureError> {
        let outcome = self.recorder.lock().await.finish(cancelled).await?;
        match outcome {
            RecordingOutcome::Cancelled => Ok(RecordingResult::Cancelled),
            RecordingOutcome::TooShort { elapsed_secs } => {
                Ok(RecordingResult::TooShort { elapsed_secs })
            }
            RecordingOutcome::Completed { path, elapsed_secs } => {
                info!(elapsed_secs, "transmitting voice turn");
                let data = tokio::fs::read(&path).await?;
                let sent = self
                    .exchange
                    .send_user_turn(TurnInput::Audio {
                        data,
                        format: "wav".to_string(),
                    })
                    .await;
                Ok(RecordingResult::Sent(sent))
            }
        }
    }

    /// Update whether this session is the foreground surface.
    ///
    /// Losing visibility tears down playback synchronously; regaining it
    /// re-enables the audio subsystem before new playback is accepted.
    pub async fn set_visible(&self, visible: bool) {
        if *self.visibility.borrow() == visible {
            return;
        }
        self.visibility.send_replace(visible);
        if visible {
            info!(session = %self.options.session_id, "session visible again");
            self.gate.set_enabled(true);
        } else {
            info!(session = %self.options.session_id, "session hidden, stopping audio");
            self.stop_all_audio().await;
        }
    }

    /// Forcefully stop all audio output.
    ///
    /// Disables the audio subsystem first, stops playback, then re-enables
    /// after a grace delay; abrupt teardown can otherwise leave the
    /// platform audio service in an inconsistent state.
    pub async fn stop_all_audio(&self) {
        self.gate.set_enabled(false);
        self.playback.stop_all().await;

        let gate = Arc::clone(&self.gate);
        tokio::spawn(async move {
            tokio::time::sleep(AUDIO_REENABLE_GRACE).await;
            gate.set_enabled(true);
        });
    }

    /// Tear the session down and report practice time.
    pub async fn close(&self) {
        self.stop_all_audio().await;

        let elapsed = Utc::now().signed_duration_since(self.started_at);
        let minutes = (elapsed.num_seconds().max(0) as f64 / 60.0).ceil() as u32;
        if minutes >= 1 {
            if let Err(e) = self.progress.add_practice_minutes(minutes).await {
                warn!("failed to record practice minutes: {e}");
            }
        }

        info!(session = %self.options.session_id, minutes, "session closed");
    }
}
