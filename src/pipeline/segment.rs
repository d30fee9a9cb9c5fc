//! Per-pair segment processing.
//!
//! Each worker resolves the clip's source media, renders the scoreboard
//! overlay for its score row, and drives one encoder invocation. A missing
//! source or a failed encode skips the segment; nothing here ends the run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use matchcut_av::actions::{self, SegmentJob};
use matchcut_av::ToolRegistry;
use matchcut_core::config::Config;
use matchcut_core::{Clip, EncoderProfile, ProgressEvent, ProgressSink, ScoreRecord, Segment};
use matchcut_overlay::{ScoreboardRenderer, Scoreline};

use super::frames_to_seconds;

/// Shared, immutable state for the worker pool. One per run.
pub(crate) struct SegmentContext {
    pub config: Arc<Config>,
    pub tools: Arc<ToolRegistry>,
    pub profile: EncoderProfile,
    pub renderer: Arc<ScoreboardRenderer>,
    pub temp_dir: PathBuf,
    pub source_bitrate_mbps: Option<f64>,
    pub progress: ProgressSink,
    /// Wall times of completed segments, for the average/ETA estimate.
    pub timings: Mutex<Vec<f64>>,
    pub total: usize,
}

impl SegmentContext {
    fn emit(&self, event: ProgressEvent) {
        let sink: &dyn Fn(ProgressEvent) = self.progress.as_ref();
        sink(event);
    }

    /// Record a completed segment's wall time; returns (average, eta).
    fn record_timing(&self, elapsed_secs: f64) -> (f64, f64) {
        let mut timings = self.timings.lock().expect("timings lock");
        timings.push(elapsed_secs);
        let avg = timings.iter().sum::<f64>() / timings.len() as f64;
        let remaining = self.total.saturating_sub(timings.len());
        (avg, avg * remaining as f64)
    }
}

/// Resolve a clip's source media: the configured video directory first,
/// then the current directory.
pub(crate) fn resolve_source(video_dir: &Path, clip_name: &str) -> Option<PathBuf> {
    let candidate = video_dir.join(clip_name);
    if candidate.exists() {
        return Some(candidate);
    }
    let fallback = Path::new(".").join(clip_name);
    fallback.exists().then_some(fallback)
}

/// A completed set is shown only once it differs from the running games
/// score; equality means that set is still in progress.
fn visible_set(completed: Option<&str>, games: &str) -> Option<String> {
    completed.filter(|s| *s != games).map(str::to_string)
}

/// Process one (clip, score) pair. Returns `None` when the segment was
/// skipped for any reason.
pub(crate) async fn process_pair(
    ctx: &SegmentContext,
    index: usize,
    clip: Clip,
    score: ScoreRecord,
) -> Option<Segment> {
    let started = Instant::now();
    ctx.emit(ProgressEvent::SegmentStarted {
        index,
        clip: clip.name.clone(),
    });
    tracing::info!("[{}/{}] Processing clip {}", index + 1, ctx.total, clip.name);

    let Some(source) = resolve_source(&ctx.config.video.video_dir, &clip.name) else {
        let err = matchcut_core::Error::missing_media(&clip.name);
        tracing::warn!("{err}, skipping");
        ctx.emit(ProgressEvent::SegmentSkipped {
            index,
            clip: clip.name,
            reason: err.to_string(),
        });
        return None;
    };

    let frame_rate = ctx.config.video.frame_rate;
    let start_secs = frames_to_seconds(clip.in_frame, frame_rate);
    let duration_secs = frames_to_seconds(clip.duration_frames(), frame_rate);
    tracing::debug!(
        "Clip {}: start {:.2}s, duration {:.2}s",
        clip.name,
        start_secs,
        duration_secs
    );

    let line = Scoreline {
        team1: ctx.config.teams.team1.clone(),
        team2: ctx.config.teams.team2.clone(),
        games: score.games.clone(),
        points: score.points.clone(),
        set1: visible_set(score.completed_set1.as_deref(), &score.games),
        set2: visible_set(score.completed_set2.as_deref(), &score.games),
    };

    // Rendering is CPU-bound; keep it off the async workers.
    let overlay_path = ctx.temp_dir.join(format!("overlay_{index:03}.png"));
    let renderer = Arc::clone(&ctx.renderer);
    let render_path = overlay_path.clone();
    let rendered =
        tokio::task::spawn_blocking(move || renderer.render_to_file(&line, &render_path)).await;
    match rendered {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!("Overlay render failed for clip '{}': {e}", clip.name);
            ctx.emit(ProgressEvent::SegmentFailed {
                index,
                clip: clip.name,
                error: e.to_string(),
            });
            return None;
        }
        Err(e) => {
            tracing::error!("Overlay render task died for clip '{}': {e}", clip.name);
            ctx.emit(ProgressEvent::SegmentFailed {
                index,
                clip: clip.name,
                error: e.to_string(),
            });
            return None;
        }
    }

    let output = ctx.temp_dir.join(format!("segment_{index:03}.mp4"));
    let job = SegmentJob {
        source,
        overlay: overlay_path,
        output: output.clone(),
        start_secs,
        duration_secs,
        source_bitrate_mbps: ctx.source_bitrate_mbps,
        audio_bitrate: ctx.config.encode.audio_bitrate.clone(),
        copy_audio: ctx.config.encode.copy_audio,
    };

    if let Err(e) = actions::encode_segment(&ctx.tools, &ctx.profile, &job).await {
        tracing::warn!("Encoder failed for clip '{}': {e}", clip.name);
        ctx.emit(ProgressEvent::SegmentFailed {
            index,
            clip: clip.name,
            error: e.to_string(),
        });
        return None;
    }

    let elapsed = started.elapsed().as_secs_f64();
    let (avg, eta) = ctx.record_timing(elapsed);
    ctx.emit(ProgressEvent::SegmentFinished {
        index,
        clip: clip.name,
        elapsed_secs: elapsed,
        avg_secs: avg,
        eta_secs: eta,
    });

    Some(Segment { index, path: output })
}
