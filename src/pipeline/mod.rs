//! Run orchestration.
//!
//! A [`Pipeline`] is built once per invocation: it discovers tools, selects
//! the encoder profile (immutable for the rest of the run), and loads the
//! scoreboard renderer. [`Pipeline::run`] then parses both inputs, pairs
//! them positionally, encodes segments through a bounded worker pool, and
//! concatenates the survivors in timeline order.
//!
//! Per-segment failures (missing source media, encoder exit) skip that
//! segment and continue; parse failures and a failed concat end the run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;

use matchcut_av::{actions, encoder, probe, ToolRegistry};
use matchcut_core::config::Config;
use matchcut_core::{
    null_progress, Clip, EncoderProfile, Error, ProgressEvent, ProgressSink, Result, ScoreRecord,
    Segment,
};
use matchcut_overlay::ScoreboardRenderer;

mod segment;

use segment::SegmentContext;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Segments encoded and concatenated.
    pub written: usize,
    /// Segments skipped (missing media or encoder failure).
    pub skipped: usize,
    /// The final video file.
    pub output: PathBuf,
    /// Total wall time for the run.
    pub elapsed: Duration,
}

/// Convert a frame count to seconds at the given frame rate.
pub fn frames_to_seconds(frames: i64, frame_rate: f64) -> f64 {
    frames as f64 / frame_rate
}

/// Human-readable duration: `2h05m10s`, `5m02s`, or `42s`.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}h{minutes:02}m{seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// Pair clips and score rows by position, truncating to the shorter list.
///
/// There is no correlation key between the two inputs; position is the
/// contract. A length mismatch is worth a warning but not an error.
pub fn pair_by_position(clips: Vec<Clip>, scores: Vec<ScoreRecord>) -> Vec<(Clip, ScoreRecord)> {
    if clips.len() != scores.len() {
        tracing::warn!(
            "{} clips but {} score rows; truncating to {}",
            clips.len(),
            scores.len(),
            clips.len().min(scores.len())
        );
    }
    clips.into_iter().zip(scores).collect()
}

/// The assembled run: config, discovered tools, one encoder profile, one
/// renderer.
pub struct Pipeline {
    config: Arc<Config>,
    tools: Arc<ToolRegistry>,
    profile: EncoderProfile,
    renderer: Arc<ScoreboardRenderer>,
    progress: ProgressSink,
}

impl Pipeline {
    /// Build a pipeline that reports progress nowhere.
    pub async fn new(config: Config) -> Result<Self> {
        Self::with_progress(config, null_progress()).await
    }

    /// Build a pipeline with an explicit progress callback.
    ///
    /// # Errors
    ///
    /// [`Error::Font`] when the overlay renderer cannot load a system font.
    /// Encoder selection never fails; a probe failure selects the software
    /// fallback.
    pub async fn with_progress(config: Config, progress: ProgressSink) -> Result<Self> {
        let tools = Arc::new(ToolRegistry::discover(&config.tools));
        let profile = encoder::select_encoder(&tools, &config.encode).await;
        let renderer = Arc::new(ScoreboardRenderer::new(
            config.video.width,
            config.video.height,
        )?);

        Ok(Self {
            config: Arc::new(config),
            tools,
            profile,
            renderer,
            progress,
        })
    }

    /// The encoder profile selected for this run.
    pub fn profile(&self) -> &EncoderProfile {
        &self.profile
    }

    /// The discovered tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Parse both inputs and process the full run.
    pub async fn run(&self, timeline: &Path, scores: &Path, output: &Path) -> Result<RunSummary> {
        let clips = matchcut_parse::parse_timeline(timeline)?;
        tracing::info!("Found {} clips in {}", clips.len(), timeline.display());

        let records = matchcut_parse::parse_scores(scores)?;
        tracing::info!("Found {} score rows in {}", records.len(), scores.display());

        self.process(clips, records, output).await
    }

    /// Process already-parsed clips and scores into `output`.
    pub async fn process(
        &self,
        clips: Vec<Clip>,
        scores: Vec<ScoreRecord>,
        output: &Path,
    ) -> Result<RunSummary> {
        let started = Instant::now();

        let pairs = pair_by_position(clips, scores);
        let total = pairs.len();
        self.emit(ProgressEvent::RunStarted { pairs: total });

        // Everything intermediate lives here and disappears with the run.
        let temp_dir = tempfile::tempdir()?;

        let source_bitrate = self
            .detect_source_bitrate(pairs.first().map(|(c, _)| c))
            .await;

        let concurrency = self.config.encode.concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let ctx = Arc::new(SegmentContext {
            config: Arc::clone(&self.config),
            tools: Arc::clone(&self.tools),
            profile: self.profile.clone(),
            renderer: Arc::clone(&self.renderer),
            temp_dir: temp_dir.path().to_path_buf(),
            source_bitrate_mbps: source_bitrate,
            progress: Arc::clone(&self.progress),
            timings: Mutex::new(Vec::new()),
            total,
        });

        let mut handles = Vec::with_capacity(total);
        for (index, (clip, score)) in pairs.into_iter().enumerate() {
            let ctx = Arc::clone(&ctx);
            let semaphore = Arc::clone(&semaphore);
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                segment::process_pair(&ctx, index, clip, score).await
            }));
        }

        let mut segments: Vec<Segment> = Vec::new();
        let mut skipped = 0usize;
        for handle in handles {
            match handle.await {
                Ok(Some(segment)) => segments.push(segment),
                Ok(None) => skipped += 1,
                Err(e) => {
                    tracing::error!("Segment task panicked: {e}");
                    skipped += 1;
                }
            }
        }

        // Pool completion order is arbitrary; restore timeline order.
        segments.sort_by_key(|s| s.index);

        if segments.is_empty() {
            return Err(Error::Concat("no segments were produced".into()));
        }

        self.emit(ProgressEvent::ConcatStarted {
            segments: segments.len(),
        });
        let manifest = temp_dir.path().join("concat_list.txt");
        let paths: Vec<PathBuf> = segments.iter().map(|s| s.path.clone()).collect();
        actions::concat_segments(&self.tools, &paths, &manifest, output).await?;

        let elapsed = started.elapsed();
        self.emit(ProgressEvent::RunFinished {
            written: segments.len(),
            skipped,
            elapsed_secs: elapsed.as_secs_f64(),
        });
        tracing::info!(
            "Run finished: {} segments written, {} skipped, {}",
            segments.len(),
            skipped,
            format_duration(elapsed.as_secs_f64())
        );

        Ok(RunSummary {
            written: segments.len(),
            skipped,
            output: output.to_path_buf(),
            elapsed,
        })
    }

    /// Bitrate of the first clip's source, used to rescale bitrate-targeted
    /// encoder profiles. Best-effort: any failure is `None`.
    async fn detect_source_bitrate(&self, first_clip: Option<&Clip>) -> Option<f64> {
        let clip = first_clip?;
        let source = segment::resolve_source(&self.config.video.video_dir, &clip.name)?;
        let mbps = probe::source_bitrate_mbps(&self.tools, &source).await;
        if let Some(b) = mbps {
            tracing::info!("Detected source bitrate: {b:.1} Mbps");
        }
        mbps
    }

    fn emit(&self, event: ProgressEvent) {
        let sink: &dyn Fn(ProgressEvent) = self.progress.as_ref();
        sink(event);
    }
}
