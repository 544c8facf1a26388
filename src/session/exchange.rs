use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use base64::Engine;
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info, warn};

use super::completion::is_completion_reply;
use super::config::SessionOptions;
use super::context::{opening_instruction, resolve_context};
use crate::agent::{AgentClient, AgentRequest, ChatMessage, CONNECT_FALLBACK_MESSAGE};
use crate::agent::SpeechClient;
use crate::playback::PlaybackManager;
use crate::progress::LessonProgress;
use crate::transcript::{Transcript, Turn, TurnId, LESSON_COMPLETE_TEXT};

/// User input for one turn.
#[derive(Debug, Clone)]
pub enum TurnInput {
    /// Typed text, appended to the transcript immediately
    Text(String),
    /// Recorded audio, forwarded opaquely; transcription happens remotely,
    /// so no user turn is appended
    Audio { data: Vec<u8>, format: String },
}

/// Caller-visible result of attempting to send a turn.
///
/// Network and parse failures are not represented here: they are absorbed
/// into a fallback agent turn and still count as `Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// An agent turn (real or fallback) was appended
    Delivered,
    /// The lesson already completed; no further turns are accepted
    LessonOver,
    /// A reply is still in flight
    Busy,
    /// The session is not the foreground surface; nothing happened
    NotVisible,
    /// Nothing to do (empty input, or an initial turn for a transcript
    /// that already has one)
    Skipped,
}

/// Events emitted as the transcript evolves, for UI rendering.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    TurnAdded(Turn),
    /// Synthesized speech was attached to an existing turn
    TurnAudioReady(TurnId),
    Awaiting(bool),
    LessonCompleted,
}

/// Orchestrates one user turn: request to the remote agent, reply into the
/// transcript, optional speech synthesis, completion detection.
///
/// Failure policy: turn delivery always completes with some visible agent
/// turn. Nothing escapes this boundary as an error.
pub struct TurnExchange {
    agent: Arc<dyn AgentClient>,
    speech: Arc<dyn SpeechClient>,
    playback: Arc<PlaybackManager>,
    progress: Arc<dyn LessonProgress>,
    options: SessionOptions,
    transcript: Mutex<Transcript>,
    awaiting: AtomicBool,
    completed: AtomicBool,
    visibility: watch::Receiver<bool>,
    events: broadcast::Sender<SessionEvent>,
}

impl TurnExchange {
    pub fn new(
        agent: Arc<dyn AgentClient>,
        speech: Arc<dyn SpeechClient>,
        playback: Arc<PlaybackManager>,
        progress: Arc<dyn LessonProgress>,
        options: SessionOptions,
        visibility: watch::Receiver<bool>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            agent,
            speech,
            playback,
            progress,
            options,
            transcript: Mutex::new(Transcript::new()),
            awaiting: AtomicBool::new(false),
            completed: AtomicBool::new(false),
            visibility,
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting.load(Ordering::SeqCst)
    }

    pub fn is_lesson_complete(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }

    pub async fn transcript_snapshot(&self) -> Vec<Turn> {
        self.transcript.lock().await.turns().to_vec()
    }

    /// Send one user turn to the agent.
    ///
    /// Rejected after lesson completion and while a reply is in flight;
    /// a no-op when the session is not visible.
    pub async fn send_user_turn(self: &Arc<Self>, input: TurnInput) -> SendOutcome {
        if self.completed.load(Ordering::SeqCst) {
            return SendOutcome::LessonOver;
        }
        if !*self.visibility.borrow() {
            debug!("session not visible, ignoring user turn");
            return SendOutcome::NotVisible;
        }
        if let TurnInput::Text(text) = &input {
            if text.trim().is_empty() {
                return SendOutcome::Skipped;
            }
        }
        if !self.begin_awaiting() {
            return SendOutcome::Busy;
        }

        let request = self.build_request(input).await;
        self.deliver(request).await;
        SendOutcome::Delivered
    }

    /// Send the automatic opening turn so the agent speaks first.
    ///
    /// Only runs when the transcript is still empty and the session is
    /// visible.
    pub async fn send_initial(self: &Arc<Self>) -> SendOutcome {
        if !*self.visibility.borrow() {
            return SendOutcome::NotVisible;
        }
        if !self.transcript.lock().await.is_empty() {
            return SendOutcome::Skipped;
        }
        if !self.begin_awaiting() {
            return SendOutcome::Busy;
        }

        info!(session = %self.options.session_id, "requesting opening turn");
        let request = AgentRequest {
            text: Some(opening_instruction(&self.options)),
            audio: None,
            format: None,
            tts: true,
            messages: Vec::new(),
            dialect: self.options.dialect.id.clone(),
            context: resolve_context(&self.options),
            is_simulation: self.options.is_simulation,
            is_initial: Some(true),
        };
        self.deliver(request).await;
        SendOutcome::Delivered
    }

    fn begin_awaiting(&self) -> bool {
        let acquired = self
            .awaiting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if acquired {
            self.emit(SessionEvent::Awaiting(true));
        }
        acquired
    }

    async fn build_request(&self, input: TurnInput) -> AgentRequest {
        let mut transcript = self.transcript.lock().await;

        let (text, audio, format, messages) = match input {
            TurnInput::Text(text) => {
                let text = text.trim().to_string();
                let turn = transcript.push_user(text.clone());
                self.emit(SessionEvent::TurnAdded(turn));
                // History includes the turn just appended.
                let messages = ChatMessage::from_transcript(&transcript);
                (Some(text), None, None, messages)
            }
            TurnInput::Audio { data, format } => {
                let messages = ChatMessage::from_transcript(&transcript);
                let encoded = base64::engine::general_purpose::STANDARD.encode(data);
                (None, Some(encoded), Some(format), messages)
            }
        };

        AgentRequest {
            text,
            audio,
            format,
            tts: false,
            messages,
            dialect: self.options.dialect.id.clone(),
            context: resolve_context(&self.options),
            is_simulation: self.options.is_simulation,
            is_initial: None,
        }
    }

    /// Run the request and land a reply in the transcript, clearing the
    /// awaiting flag on every path.
    async fn deliver(self: &Arc<Self>, request: AgentRequest) {
        let reply = match self.agent.send(&request).await {
            Ok(message) => message,
            Err(e) => {
                warn!("agent request failed, using fallback reply: {e}");
                CONNECT_FALLBACK_MESSAGE.to_string()
            }
        };

        self.handle_reply(reply).await;

        self.awaiting.store(false, Ordering::SeqCst);
        self.emit(SessionEvent::Awaiting(false));
    }

    async fn handle_reply(self: &Arc<Self>, message: String) {
        let turn = {
            let mut transcript = self.transcript.lock().await;
            transcript.push_agent(&message)
        };
        self.emit(SessionEvent::TurnAdded(turn.clone()));

        // Simulation sessions never evaluate completion phrases.
        if !self.options.is_simulation && is_completion_reply(&message) {
            self.mark_complete().await;
        }

        if self.options.tts_enabled && *self.visibility.borrow() {
            self.spawn_speech_fetch(turn.id, message);
        }
    }

    /// Fetch synthesized speech for an agent turn without blocking the
    /// transcript update. The turn is already visible with no audio; it is
    /// patched by id when (and if) synthesis resolves, provided the
    /// session is still visible.
    fn spawn_speech_fetch(self: &Arc<Self>, turn_id: TurnId, text: String) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let Some(audio) = this.speech.fetch_speech(&text).await else {
                debug!(%turn_id, "no speech for turn, continuing text-only");
                return;
            };
            if !*this.visibility.borrow() {
                debug!(%turn_id, "session no longer visible, dropping synthesized speech");
                return;
            }
            {
                let mut transcript = this.transcript.lock().await;
                if !transcript.attach_audio(turn_id, audio.clone()) {
                    return;
                }
            }
            this.emit(SessionEvent::TurnAudioReady(turn_id));
            if let Err(e) = this.playback.play(audio, turn_id).await {
                warn!(%turn_id, "playback failed: {e}");
            }
        });
    }

    /// One-way completion transition: set the flag, append the system
    /// turn, and notify the progress collaborator exactly once.
    async fn mark_complete(self: &Arc<Self>) {
        if self
            .completed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let turn = {
            let mut transcript = self.transcript.lock().await;
            transcript.push_system(LESSON_COMPLETE_TEXT)
        };
        self.emit(SessionEvent::TurnAdded(turn));
        self.emit(SessionEvent::LessonCompleted);

        if let Some(lesson) = &self.options.lesson {
            info!(
                lesson = lesson.lesson_id,
                unit = lesson.unit_id,
                "lesson completed"
            );
            if let Err(e) = self
                .progress
                .mark_lesson_complete(lesson.lesson_id, lesson.unit_id)
                .await
            {
                warn!("failed to report lesson completion: {e}");
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        // Send fails only when nobody is subscribed, which is fine.
        let _ = self.events.send(event);
    }
}
