//! Lossless segment concatenation via the ffmpeg concat demuxer.
//!
//! Segments are joined with `-c copy`; nothing is re-encoded here, so the
//! only failure modes are a malformed manifest or mismatched segment
//! parameters, both of which surface as [`matchcut_core::Error::Concat`].

use std::path::{Path, PathBuf};

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// Render the concat demuxer manifest: one `file '<path>'` line per segment.
///
/// Single quotes inside a path use the demuxer's quote-break escape
/// (`'\''`), the same convention as shell quoting.
fn manifest_contents(segments: &[PathBuf]) -> String {
    let mut out = String::new();
    for path in segments {
        let escaped = path.to_string_lossy().replace('\'', r"'\''");
        out.push_str(&format!("file '{escaped}'\n"));
    }
    out
}

/// Write the ordered segment manifest to `manifest_path`.
pub fn write_manifest(segments: &[PathBuf], manifest_path: &Path) -> matchcut_core::Result<()> {
    std::fs::write(manifest_path, manifest_contents(segments))?;
    Ok(())
}

/// Concatenate `segments` (already in final order) into `output`.
///
/// # Errors
///
/// [`matchcut_core::Error::Concat`] when there is nothing to join or ffmpeg
/// exits non-zero. In both cases no output file is promoted.
pub async fn concat_segments(
    tools: &ToolRegistry,
    segments: &[PathBuf],
    manifest_path: &Path,
    output: &Path,
) -> matchcut_core::Result<()> {
    if segments.is_empty() {
        return Err(matchcut_core::Error::Concat(
            "no segments to concatenate".into(),
        ));
    }

    write_manifest(segments, manifest_path)?;

    let ffmpeg = tools
        .require("ffmpeg")
        .map_err(|e| matchcut_core::Error::Concat(e.to_string()))?;

    tracing::info!("Concatenating {} segments into {}", segments.len(), output.display());

    ToolCommand::new(ffmpeg.path.clone())
        .args(["-f", "concat", "-safe", "0", "-i"])
        .arg(manifest_path.to_string_lossy())
        .args(["-c", "copy", "-y"])
        .arg(output.to_string_lossy())
        .execute()
        .await
        .map_err(|e| matchcut_core::Error::Concat(e.to_string()))?;

    Ok(())
}
