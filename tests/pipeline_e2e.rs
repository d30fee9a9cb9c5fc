//! End-to-end pipeline tests against stub ffmpeg/ffprobe executables.
//!
//! The stubs honour the only contract surface the pipeline relies on --
//! argument order and exit codes -- and create the output file named by the
//! final argument, so a full run can be exercised without real media.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use matchcut::pipeline::Pipeline;
use matchcut_core::config::Config;
use matchcut_core::{Clip, Error, ProgressEvent, ProgressSink, ScoreRecord};

const FFMPEG_STUB: &str = r#"#!/bin/sh
# Touch the output file (the last argument) when one is expected.
for last in "$@"; do :; done
case "$last" in
  *.mp4) : > "$last" ;;
esac
exit 0
"#;

const FFPROBE_STUB: &str = "#!/bin/sh\nexit 0\n";

fn write_stub(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn clip(name: &str, in_frame: i64, frames: i64) -> Clip {
    Clip {
        name: name.into(),
        start_frame: 0,
        end_frame: frames,
        in_frame,
        out_frame: in_frame + frames,
        source_path: format!("file://localhost/media/{name}"),
    }
}

fn score(point: u32, games: &str, points: &str) -> ScoreRecord {
    ScoreRecord {
        set_number: 1,
        point_number: point,
        completed_set1: None,
        completed_set2: None,
        games: games.into(),
        points: points.into(),
        comment: String::new(),
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    config: Config,
    media_dir: PathBuf,
    output: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let ffmpeg = write_stub(dir.path(), "ffmpeg", FFMPEG_STUB);
        let ffprobe = write_stub(dir.path(), "ffprobe", FFPROBE_STUB);

        let media_dir = dir.path().join("media");
        fs::create_dir(&media_dir).unwrap();

        let mut config = Config::default();
        config.tools.ffmpeg_path = Some(ffmpeg);
        config.tools.ffprobe_path = Some(ffprobe);
        config.video.video_dir = media_dir.clone();
        // Small canvas keeps overlay rendering fast in tests.
        config.video.width = 640;
        config.video.height = 360;
        config.encode.concurrency = 2;

        let output = dir.path().join("output_final.mp4");
        Self {
            _dir: dir,
            config,
            media_dir,
            output,
        }
    }

    fn add_media(&self, name: &str) {
        fs::write(self.media_dir.join(name), b"media").unwrap();
    }
}

/// Build a pipeline, skipping the test on hosts without any system font.
async fn pipeline_or_skip(config: Config, progress: ProgressSink) -> Option<Pipeline> {
    match Pipeline::with_progress(config, progress).await {
        Ok(pipeline) => Some(pipeline),
        Err(Error::Font(_)) => None,
        Err(e) => panic!("unexpected pipeline construction error: {e}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_source_skips_but_run_succeeds() {
    let harness = Harness::new();
    // Clip 2's source is deliberately absent.
    harness.add_media("point_001.mp4");
    harness.add_media("point_003.mp4");

    let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);
    let progress: ProgressSink = Arc::new(move |ev| sink_events.lock().unwrap().push(ev));

    let Some(pipeline) = pipeline_or_skip(harness.config.clone(), progress).await else {
        return;
    };

    let clips = vec![
        clip("point_001.mp4", 0, 300),
        clip("point_002.mp4", 300, 420),
        clip("point_003.mp4", 720, 150),
    ];
    let scores = vec![
        score(1, "0/0", "0/0"),
        score(2, "0/0", "15/0"),
        score(3, "0/0", "30/0"),
    ];

    let summary = pipeline
        .process(clips, scores, &harness.output)
        .await
        .expect("run should succeed with two surviving segments");

    assert_eq!(summary.written, 2);
    assert_eq!(summary.skipped, 1);
    assert!(harness.output.exists(), "concatenated output missing");

    let events = events.lock().unwrap();
    let skips: Vec<_> = events
        .iter()
        .filter_map(|ev| match ev {
            ProgressEvent::SegmentSkipped { index, clip, .. } => Some((*index, clip.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(skips, vec![(1, "point_002.mp4".to_string())]);

    let finished = events
        .iter()
        .filter(|ev| matches!(ev, ProgressEvent::SegmentFinished { .. }))
        .count();
    assert_eq!(finished, 2);
    assert!(events
        .iter()
        .any(|ev| matches!(ev, ProgressEvent::ConcatStarted { segments: 2 })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn length_mismatch_truncates_to_shorter_list() {
    let harness = Harness::new();
    harness.add_media("point_001.mp4");
    harness.add_media("point_002.mp4");
    harness.add_media("point_003.mp4");

    let Some(pipeline) =
        pipeline_or_skip(harness.config.clone(), matchcut_core::null_progress()).await
    else {
        return;
    };

    // Three clips, two score rows: only two segments get processed.
    let clips = vec![
        clip("point_001.mp4", 0, 300),
        clip("point_002.mp4", 300, 300),
        clip("point_003.mp4", 600, 300),
    ];
    let scores = vec![score(1, "0/0", "0/0"), score(2, "0/0", "15/0")];

    let summary = pipeline
        .process(clips, scores, &harness.output)
        .await
        .unwrap();
    assert_eq!(summary.written, 2);
    assert_eq!(summary.skipped, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn all_sources_missing_fails_without_output() {
    let harness = Harness::new();

    let Some(pipeline) =
        pipeline_or_skip(harness.config.clone(), matchcut_core::null_progress()).await
    else {
        return;
    };

    let clips = vec![clip("point_001.mp4", 0, 300)];
    let scores = vec![score(1, "0/0", "0/0")];

    let result = pipeline.process(clips, scores, &harness.output).await;
    assert!(matches!(result, Err(Error::Concat(_))));
    assert!(!harness.output.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn segments_arrive_in_timeline_order() {
    let harness = Harness::new();
    for i in 1..=5 {
        harness.add_media(&format!("point_{i:03}.mp4"));
    }

    let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);
    let progress: ProgressSink = Arc::new(move |ev| sink_events.lock().unwrap().push(ev));

    let Some(pipeline) = pipeline_or_skip(harness.config.clone(), progress).await else {
        return;
    };

    let clips: Vec<Clip> = (1..=5)
        .map(|i| clip(&format!("point_{i:03}.mp4"), i * 100, 120))
        .collect();
    let scores: Vec<ScoreRecord> = (1..=5).map(|i| score(i as u32, "0/0", "0/0")).collect();

    let summary = pipeline
        .process(clips, scores, &harness.output)
        .await
        .unwrap();
    assert_eq!(summary.written, 5);

    // Pool completion order may interleave; the run summary and concat see
    // timeline order, which RunFinished confirms totals for.
    let events = events.lock().unwrap();
    assert!(events.iter().any(
        |ev| matches!(ev, ProgressEvent::RunFinished { written: 5, skipped: 0, .. })
    ));
}
