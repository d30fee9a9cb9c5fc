//! Parsed data model: timeline clips, score rows, encoder profiles, segments.
//!
//! Everything here is produced once by a parser or probe and read-only
//! afterwards. Clips and score records have no shared key; the pipeline
//! pairs them purely by position.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Clip
// ---------------------------------------------------------------------------

/// One clip item from the editing-timeline export.
///
/// Frame numbers are in sequence time (`start`/`end`) and source-media time
/// (`in`/`out`), exactly as exported by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    /// Display name, usually the source file name.
    pub name: String,
    /// First frame of this clip on the sequence.
    pub start_frame: i64,
    /// One past the last frame of this clip on the sequence.
    pub end_frame: i64,
    /// In-point into the source media, in frames.
    pub in_frame: i64,
    /// Out-point into the source media, in frames.
    pub out_frame: i64,
    /// Source file reference from the export (`pathurl`), possibly empty.
    pub source_path: String,
}

impl Clip {
    /// Clip length in frames. Clamped to zero for degenerate exports.
    pub fn duration_frames(&self) -> i64 {
        (self.end_frame - self.start_frame).max(0)
    }
}

// ---------------------------------------------------------------------------
// ScoreRecord
// ---------------------------------------------------------------------------

/// One row of the per-point score sheet.
///
/// `games` and `points` hold `"a/b"` strings as typed into the sheet; use
/// [`ScorePair::parse`] to split them. Completed set scores are only present
/// once the corresponding set has been recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Set this point belongs to (1-based).
    pub set_number: u32,
    /// Point index within the match (1-based).
    pub point_number: u32,
    /// Final score of set 1, if the sheet carries one.
    pub completed_set1: Option<String>,
    /// Final score of set 2, if the sheet carries one.
    pub completed_set2: Option<String>,
    /// Current games in the running set, `"a/b"`.
    pub games: String,
    /// Current points in the running game, `"a/b"`.
    pub points: String,
    /// Free-text comment column, possibly empty.
    pub comment: String,
}

// ---------------------------------------------------------------------------
// ScorePair
// ---------------------------------------------------------------------------

/// A two-sided score split out of an `"a/b"` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePair {
    /// Team 1's side of the score.
    pub team1: String,
    /// Team 2's side of the score.
    pub team2: String,
}

impl ScorePair {
    /// Split an `"a/b"` score string on the separator.
    ///
    /// Both sides are trimmed. A missing right side defaults to `"0"`; input
    /// without a separator (including empty input) defaults both sides to
    /// `"0"`.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('/') {
            Some((left, right)) => {
                let team2 = right.trim();
                Self {
                    team1: left.trim().to_string(),
                    team2: if team2.is_empty() { "0".into() } else { team2.into() },
                }
            }
            None => Self {
                team1: "0".into(),
                team2: "0".into(),
            },
        }
    }
}

impl fmt::Display for ScorePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.team1, self.team2)
    }
}

// ---------------------------------------------------------------------------
// EncoderProfile
// ---------------------------------------------------------------------------

/// The encoder configuration chosen once per run by capability probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderProfile {
    /// ffmpeg video encoder name (e.g. `hevc_nvenc`, `libx264`).
    pub codec: String,
    /// Encoder preset, when the codec takes one.
    pub preset: Option<String>,
    /// CRF quality value for software encoders.
    pub crf: Option<u32>,
    /// Decode-side acceleration flags, placed before the first `-i`.
    pub hwaccel_args: Vec<String>,
    /// Additional encoder arguments appended after codec/preset/CRF.
    pub extra_args: Vec<String>,
    /// True when `extra_args` carry `-b:v`/`-maxrate:v`/`-bufsize:v` values
    /// that may be rescaled from a detected source bitrate.
    pub bitrate_targeted: bool,
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One encoded output chunk, waiting in the run's temp directory to be
/// concatenated with its peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position of the originating (clip, score) pair. Concatenation order.
    pub index: usize,
    /// Path of the encoded segment file inside the run temp directory.
    pub path: PathBuf,
}
