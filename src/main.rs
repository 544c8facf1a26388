use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use kalam::profile::{selected_dialect, Identity, InMemoryProfile};
use kalam::session::{SendOutcome, SessionEvent};
use kalam::{
    Config, HttpAgentClient, HttpTtsClient, NullBackend, NullGate, NullProgress, NullSink,
    PlaybackSink, RecorderConfig, RodioSink, SessionController, SessionOptions, Speaker,
};

/// Console sessions run without the host app's auth provider.
struct LocalUser;

impl Identity for LocalUser {
    fn is_authenticated(&self) -> bool {
        false
    }

    fn user_id(&self) -> Option<String> {
        None
    }
}

/// Console client for voice conversation practice sessions.
#[derive(Debug, Parser)]
#[command(name = "kalam", about = "Practice a conversation with the remote tutor")]
struct Args {
    /// Path to a config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<String>,

    /// Lesson to practice
    #[arg(long)]
    lesson: Option<u32>,

    /// Unit the lesson belongs to
    #[arg(long, requires = "lesson")]
    unit: Option<u32>,

    /// Run a free-form simulation conversation (never completes a lesson)
    #[arg(long)]
    simulation: bool,

    /// Disable audio playback
    #[arg(long)]
    mute: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut options = if args.simulation {
        SessionOptions::simulation()
    } else if let (Some(lesson), Some(unit)) = (args.lesson, args.unit) {
        SessionOptions::for_lesson(lesson, unit)
    } else {
        SessionOptions::default()
    };
    options.tts_enabled = !args.mute;

    let profile = InMemoryProfile::new();
    options.dialect = selected_dialect(&profile).await;

    let user = LocalUser;
    info!(
        authenticated = user.is_authenticated(),
        dialect = %options.dialect.id,
        "starting console session"
    );

    let timeout = Duration::from_secs(cfg.api.request_timeout_secs);
    let agent = Arc::new(HttpAgentClient::new(&cfg.api.agent_url, timeout)?);
    let speech = Arc::new(HttpTtsClient::new(&cfg.api.tts_url, &cfg.api.voice, timeout)?);

    let sink: Arc<dyn PlaybackSink> = if args.mute {
        Arc::new(NullSink)
    } else {
        Arc::new(RodioSink::new())
    };

    let recorder_config = RecorderConfig {
        output_dir: PathBuf::from(&cfg.audio.recordings_path),
        min_duration_secs: cfg.audio.min_recording_secs,
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
    };

    let controller = SessionController::new(
        options,
        agent,
        speech,
        Arc::new(NullProgress),
        Arc::new(NullGate::new()),
        sink,
        Box::new(NullBackend::new()),
        recorder_config,
        true,
    );

    // Print transcript events as they arrive.
    let mut events = controller.subscribe_events();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SessionEvent::TurnAdded(turn) => match turn.speaker {
                    Speaker::User => println!("you: {}", turn.text),
                    Speaker::Agent => println!("tutor: {}", turn.text),
                    Speaker::System => println!("** {} **", turn.text),
                },
                SessionEvent::LessonCompleted => println!("** lesson marked complete **"),
                SessionEvent::TurnAudioReady(_) | SessionEvent::Awaiting(_) => {}
            }
        }
    });

    controller.start().await;

    info!("type a message and press enter; /quit to leave");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }
        if line.is_empty() {
            continue;
        }
        match controller.send_text(line).await {
            SendOutcome::Busy => println!("(still waiting for the tutor...)"),
            SendOutcome::LessonOver => {
                println!("(lesson finished; start a new session to continue)");
                break;
            }
            _ => {}
        }
    }

    controller.close().await;
    printer.abort();
    Ok(())
}
