//! Progress events emitted during a pipeline run.
//!
//! The segment pool reports through an explicit callback handed to the
//! pipeline at construction, so callers (CLI today, anything embedding the
//! library tomorrow) observe per-segment completion without reaching into
//! pipeline internals.

use std::sync::Arc;

use serde::Serialize;

/// What happened, with enough context to drive a progress display.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Parsing finished; `pairs` segments will be attempted.
    RunStarted { pairs: usize },
    /// A worker picked up the pair at `index`.
    SegmentStarted { index: usize, clip: String },
    /// Segment encoded successfully.
    ///
    /// `avg_secs` is the running mean over completed segments and
    /// `eta_secs` the estimated time remaining for the rest of the run.
    SegmentFinished {
        index: usize,
        clip: String,
        elapsed_secs: f64,
        avg_secs: f64,
        eta_secs: f64,
    },
    /// Source media was missing; the segment was skipped.
    SegmentSkipped { index: usize, clip: String, reason: String },
    /// The encoder exited non-zero; the segment was skipped.
    SegmentFailed { index: usize, clip: String, error: String },
    /// All workers done; concatenating `segments` files.
    ConcatStarted { segments: usize },
    /// The run finished and the output file exists.
    RunFinished {
        written: usize,
        skipped: usize,
        elapsed_secs: f64,
    },
}

/// Callback receiving [`ProgressEvent`]s; shared across the worker pool.
pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// A sink that discards every event.
pub fn null_progress() -> ProgressSink {
    Arc::new(|_| {})
}
