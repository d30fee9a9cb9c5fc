//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries all
//! sub-configs for team names, video timing, encoding, and tool paths. Every
//! section defaults sensibly so a completely empty `{}` file is valid.
//!
//! Constants that used to live as ambient module state (frame rate, source
//! folder, team names) are all explicit fields here and travel with the
//! config object into each component.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub teams: TeamsConfig,
    pub video: VideoConfig,
    pub encode: EncodeConfig,
    pub tools: ToolsConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Internal(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.video.frame_rate <= 0.0 {
            warnings.push(format!(
                "video.frame_rate {} is not positive; timestamps will be wrong",
                self.video.frame_rate
            ));
        }

        if self.video.width == 0 || self.video.height == 0 {
            warnings.push("video.width/height must be non-zero".into());
        }

        if self.encode.concurrency == 0 {
            warnings.push("encode.concurrency is 0; runs will use 1 worker".into());
        }

        if let Some(ref hw) = self.encode.hw_accel {
            let valid = ["none", "videotoolbox", "nvenc"];
            if !valid.contains(&hw.as_str()) {
                warnings.push(format!(
                    "encode.hw_accel '{}' is not a recognized method (valid: {})",
                    hw,
                    valid.join(", ")
                ));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Team names shown on the scoreboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamsConfig {
    pub team1: String,
    pub team2: String,
}

impl Default for TeamsConfig {
    fn default() -> Self {
        Self {
            team1: "TEAM A".into(),
            team2: "TEAM B".into(),
        }
    }
}

/// Source video timing and geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Timeline frame rate used for frame-to-seconds conversion.
    /// Defaults to NTSC 60 drop-frame.
    pub frame_rate: f64,
    /// Overlay width, matching the source resolution.
    pub width: u32,
    /// Overlay height, matching the source resolution.
    pub height: u32,
    /// Directory searched for clip source files.
    pub video_dir: PathBuf,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            frame_rate: 59.94,
            width: 3840,
            height: 2160,
            video_dir: PathBuf::from("."),
        }
    }
}

/// Segment encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// AAC bitrate for re-encoded audio.
    pub audio_bitrate: String,
    /// Stream-copy source audio instead of re-encoding to AAC.
    pub copy_audio: bool,
    /// Concurrent encoder invocations. Kept low: hardware encode units are
    /// scarce and oversubscription degrades throughput.
    pub concurrency: usize,
    /// Hardware acceleration override (none, videotoolbox, nvenc).
    /// `None` probes the host; `"none"` forces the software fallback.
    pub hw_accel: Option<String>,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            audio_bitrate: "192k".into(),
            copy_audio: false,
            concurrency: 3,
            hw_accel: None,
        }
    }
}

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
}
