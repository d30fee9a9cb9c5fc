//! Unified error type for the matchcut pipeline.
//!
//! All crates funnel their failures into [`Error`]. The orchestrator decides
//! per variant whether a failure aborts the run (parse, concat) or only
//! skips the segment it occurred in (missing media, encoder exit).

use std::path::PathBuf;

/// Unified error type covering all failure modes in matchcut.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input file (timeline export or score sheet) is malformed.
    /// Fatal to the run.
    #[error("parse error in {}: {message}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Human-readable description of what was wrong.
        message: String,
    },

    /// A clip's source media file could not be located. Skips that segment.
    #[error("source media not found for clip '{clip}'")]
    MissingMedia {
        /// Display name of the clip as given in the timeline.
        clip: String,
    },

    /// An external tool (ffmpeg, ffprobe) failed to spawn, timed out, or
    /// exited non-zero.
    #[error("tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description (includes stderr on exit errors).
        message: String,
    },

    /// The final stream-copy concatenation failed; no output is produced.
    #[error("concatenation failed: {0}")]
    Concat(String),

    /// No usable font could be loaded for the scoreboard renderer.
    #[error("font error: {0}")]
    Font(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::Parse`].
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::MissingMedia`].
    pub fn missing_media(clip: impl Into<String>) -> Self {
        Error::MissingMedia { clip: clip.into() }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// True when this failure only skips one segment instead of ending the run.
    pub fn is_segment_local(&self) -> bool {
        matches!(self, Error::MissingMedia { .. } | Error::Tool { .. })
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
