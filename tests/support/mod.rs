// Shared trait fakes for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use anyhow::Result;
use tokio::sync::{mpsc, oneshot, Mutex, Notify};

use kalam::agent::{AgentClient, AgentError, AgentRequest, SpeechClient};
use kalam::capture::{AudioFrame, CaptureBackend, CaptureError};
use kalam::playback::{PlaybackSink, SoundHandle};
use kalam::progress::LessonProgress;

/// Agent that replays scripted replies and records every request it saw.
pub struct ScriptedAgent {
    replies: Mutex<VecDeque<Result<String, u16>>>,
    pub requests: Mutex<Vec<AgentRequest>>,
}

impl ScriptedAgent {
    pub fn new(replies: Vec<Result<String, u16>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait::async_trait]
impl AgentClient for ScriptedAgent {
    async fn send(&self, request: &AgentRequest) -> Result<String, AgentError> {
        self.requests.lock().await.push(request.clone());
        match self.replies.lock().await.pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(status)) => Err(AgentError::Status(status)),
            None => Ok("Okay.".to_string()),
        }
    }
}

/// Agent that blocks until released, for exercising the in-flight guard.
pub struct BlockingAgent {
    pub release: Notify,
    reply: String,
}

impl BlockingAgent {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            release: Notify::new(),
            reply: reply.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl AgentClient for BlockingAgent {
    async fn send(&self, _request: &AgentRequest) -> Result<String, AgentError> {
        self.release.notified().await;
        Ok(self.reply.clone())
    }
}

/// Speech client returning a fixed payload (or nothing).
pub struct FakeSpeech {
    audio: Option<Vec<u8>>,
}

impl FakeSpeech {
    pub fn with_audio(len: usize) -> Arc<Self> {
        Arc::new(Self {
            audio: Some(vec![7u8; len]),
        })
    }

    pub fn silent() -> Arc<Self> {
        Arc::new(Self { audio: None })
    }
}

#[async_trait::async_trait]
impl SpeechClient for FakeSpeech {
    async fn fetch_speech(&self, _text: &str) -> Option<Vec<u8>> {
        self.audio.clone()
    }
}

/// One sound a [`FakeSink`] was asked to play.
pub struct FakeSound {
    pub bytes: usize,
    stop_rx: oneshot::Receiver<()>,
    stopped: bool,
}

impl FakeSound {
    /// Whether the manager asked this sound to stop.
    pub fn was_stopped(&mut self) -> bool {
        if !self.stopped && self.stop_rx.try_recv().is_ok() {
            self.stopped = true;
        }
        self.stopped
    }
}

/// Playback sink that records started sounds instead of playing them.
pub struct FakeSink {
    auto_finish: bool,
    pub sounds: StdMutex<Vec<FakeSound>>,
}

impl FakeSink {
    /// Sounds never finish on their own; the manager must stop them.
    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            auto_finish: false,
            sounds: StdMutex::new(Vec::new()),
        })
    }

    /// Sounds complete immediately after starting.
    pub fn auto_finishing() -> Arc<Self> {
        Arc::new(Self {
            auto_finish: true,
            sounds: StdMutex::new(Vec::new()),
        })
    }

    pub fn started(&self) -> usize {
        self.sounds.lock().unwrap().len()
    }

    pub fn was_stopped(&self, index: usize) -> bool {
        self.sounds.lock().unwrap()[index].was_stopped()
    }
}

#[async_trait::async_trait]
impl PlaybackSink for FakeSink {
    async fn start(&self, audio: Vec<u8>) -> Result<SoundHandle> {
        let (stop_tx, stop_rx) = oneshot::channel();
        let (finished_tx, finished_rx) = oneshot::channel();
        if self.auto_finish {
            let _ = finished_tx.send(());
        } else {
            // Keep the sender alive inside the handle path by leaking it to
            // a task that waits forever; dropping it would close the
            // finished channel and look like completion.
            tokio::spawn(async move {
                let _finished_tx = finished_tx;
                std::future::pending::<()>().await;
            });
        }
        self.sounds.lock().unwrap().push(FakeSound {
            bytes: audio.len(),
            stop_rx,
            stopped: false,
        });
        Ok(SoundHandle::new(stop_tx, finished_rx))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Progress collaborator that counts notifications.
#[derive(Default)]
pub struct CountingProgress {
    pub completions: AtomicU32,
    pub minutes: AtomicU32,
}

impl CountingProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn completion_count(&self) -> u32 {
        self.completions.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LessonProgress for CountingProgress {
    async fn mark_lesson_complete(&self, _lesson_id: u32, _unit_id: u32) -> Result<()> {
        self.completions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn add_practice_minutes(&self, minutes: u32) -> Result<()> {
        self.minutes.fetch_add(minutes, Ordering::SeqCst);
        Ok(())
    }
}

/// Capture backend that emits a fixed set of frames when started.
pub struct ScriptedBackend {
    frames: Vec<AudioFrame>,
    sender: Option<mpsc::Sender<AudioFrame>>,
}

impl ScriptedBackend {
    pub fn new(frames: Vec<AudioFrame>) -> Self {
        Self {
            frames,
            sender: None,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        let (tx, rx) = mpsc::channel(self.frames.len().max(1));
        for frame in &self.frames {
            tx.send(frame.clone())
                .await
                .map_err(|e| CaptureError::Backend(e.to_string()))?;
        }
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
        "scripted"
    }
}

/// Backend standing in for a user who refused microphone access.
pub struct DeniedBackend;

#[async_trait::async_trait]
impl CaptureBackend for DeniedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        Err(CaptureError::PermissionDenied)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "denied"
    }
}
