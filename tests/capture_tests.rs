mod support;

use std::time::Duration;

use kalam::capture::{
    AudioFrame, CaptureError, NullBackend, Recorder, RecorderConfig, RecordingOutcome,
};
use support::{DeniedBackend, ScriptedBackend};

fn recorder_with_null(dir: &tempfile::TempDir, min_secs: u64) -> Recorder {
    let config = RecorderConfig {
        output_dir: dir.path().to_path_buf(),
        min_duration_secs: min_secs,
        sample_rate: 16000,
        channels: 1,
    };
    Recorder::new(Box::new(NullBackend::new()), config)
}

fn recordings_in(dir: &tempfile::TempDir) -> usize {
    std::fs::read_dir(dir.path()).expect("read dir").count()
}

#[tokio::test(start_paused = true)]
async fn cancelled_recording_is_discarded_regardless_of_duration() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut recorder = recorder_with_null(&dir, 10);

    recorder.start().await.expect("start");
    tokio::time::advance(Duration::from_secs(15)).await;

    let outcome = recorder.finish(true).await.expect("finish");
    assert!(matches!(outcome, RecordingOutcome::Cancelled));
    assert_eq!(recordings_in(&dir), 0);
    assert!(!recorder.is_recording());
}

#[tokio::test(start_paused = true)]
async fn short_recording_is_discarded_with_elapsed_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut recorder = recorder_with_null(&dir, 10);

    recorder.start().await.expect("start");
    tokio::time::advance(Duration::from_secs(5)).await;

    let outcome = recorder.finish(false).await.expect("finish");
    match outcome {
        RecordingOutcome::TooShort { elapsed_secs } => assert_eq!(elapsed_secs, 5),
        other => panic!("expected TooShort, got {other:?}"),
    }
    assert_eq!(recordings_in(&dir), 0);
}

#[tokio::test(start_paused = true)]
async fn long_enough_recording_is_kept() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut recorder = recorder_with_null(&dir, 10);

    recorder.start().await.expect("start");
    tokio::time::advance(Duration::from_secs(12)).await;

    let outcome = recorder.finish(false).await.expect("finish");
    match outcome {
        RecordingOutcome::Completed { path, elapsed_secs } => {
            assert_eq!(elapsed_secs, 12);
            assert!(path.exists());
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));
        }
        other => panic!("expected Completed, got {other:?}"),
    }
    assert_eq!(recordings_in(&dir), 1);
}

#[tokio::test(start_paused = true)]
async fn elapsed_seconds_tick_while_recording() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut recorder = recorder_with_null(&dir, 10);

    recorder.start().await.expect("start");
    assert_eq!(recorder.elapsed_secs(), 0);

    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert_eq!(recorder.elapsed_secs(), 3);

    recorder.finish(true).await.expect("finish");
}

#[tokio::test]
async fn second_start_is_rejected_while_recording() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut recorder = recorder_with_null(&dir, 10);

    recorder.start().await.expect("start");
    assert!(matches!(
        recorder.start().await,
        Err(CaptureError::AlreadyRecording)
    ));

    recorder.finish(true).await.expect("finish");
}

#[tokio::test]
async fn finish_without_start_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut recorder = recorder_with_null(&dir, 10);

    assert!(matches!(
        recorder.finish(false).await,
        Err(CaptureError::NotRecording)
    ));
}

#[tokio::test]
async fn permission_refusal_surfaces_without_activating() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = RecorderConfig {
        output_dir: dir.path().to_path_buf(),
        min_duration_secs: 10,
        sample_rate: 16000,
        channels: 1,
    };
    let mut recorder = Recorder::new(Box::new(DeniedBackend), config);

    assert!(matches!(
        recorder.start().await,
        Err(CaptureError::PermissionDenied)
    ));
    assert!(!recorder.is_recording());
}

#[tokio::test]
async fn frames_in_another_format_fail_the_recording() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = RecorderConfig {
        output_dir: dir.path().to_path_buf(),
        min_duration_secs: 0,
        sample_rate: 16000,
        channels: 1,
    };
    let frames = vec![AudioFrame {
        samples: vec![1, 2, 3],
        sample_rate: 44100,
        channels: 2,
        timestamp_ms: 0,
    }];
    let mut recorder = Recorder::new(Box::new(ScriptedBackend::new(frames)), config);

    recorder.start().await.expect("start");
    assert!(matches!(
        recorder.finish(false).await,
        Err(CaptureError::Backend(_))
    ));
}

#[tokio::test]
async fn captured_frames_land_in_the_wav_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = RecorderConfig {
        output_dir: dir.path().to_path_buf(),
        min_duration_secs: 0,
        sample_rate: 16000,
        channels: 1,
    };
    let frames = vec![
        AudioFrame {
            samples: vec![1, 2, 3],
            sample_rate: 16000,
            channels: 1,
            timestamp_ms: 0,
        },
        AudioFrame {
            samples: vec![-4, 5],
            sample_rate: 16000,
            channels: 1,
            timestamp_ms: 100,
        },
    ];
    let mut recorder = Recorder::new(Box::new(ScriptedBackend::new(frames)), config);

    recorder.start().await.expect("start");
    let outcome = recorder.finish(false).await.expect("finish");

    let path = match outcome {
        RecordingOutcome::Completed { path, .. } => path,
        other => panic!("expected Completed, got {other:?}"),
    };

    let mut reader = hound::WavReader::open(&path).expect("open wav");
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.spec().channels, 1);
    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<_, _>>()
        .expect("read samples");
    assert_eq!(samples, vec![1, 2, 3, -4, 5]);
}
