//! Best-effort source bitrate probing via ffprobe.
//!
//! The detected bitrate is only used to rescale the rate-control parameters
//! of bitrate-targeted encoder profiles, so every failure path collapses to
//! `None` rather than an error.

use std::path::Path;
use std::time::Duration;

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Query the video stream bitrate of `path`, in Mbps.
///
/// Returns `None` when ffprobe is unavailable, times out, exits non-zero, or
/// reports no bitrate (common for some containers).
pub async fn source_bitrate_mbps(tools: &ToolRegistry, path: &Path) -> Option<f64> {
    let ffprobe = tools.get("ffprobe")?;

    let result = ToolCommand::new(ffprobe.path.clone())
        .args([
            "-v", "error",
            "-select_streams", "v:0",
            "-show_entries", "stream=bit_rate",
            "-of", "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path.to_string_lossy())
        .timeout(PROBE_TIMEOUT)
        .execute()
        .await;

    match result {
        Ok(output) => {
            let mbps = parse_bitrate_mbps(&output.stdout);
            if mbps.is_none() {
                tracing::debug!("No bitrate reported for {}", path.display());
            }
            mbps
        }
        Err(e) => {
            tracing::debug!("Bitrate probe failed for {}: {e}", path.display());
            None
        }
    }
}

/// Parse ffprobe's bits-per-second output into Mbps.
fn parse_bitrate_mbps(stdout: &str) -> Option<f64> {
    let bps: u64 = stdout.trim().parse().ok()?;
    Some(bps as f64 / 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_bps() {
        let mbps = parse_bitrate_mbps("85467234\n").unwrap();
        assert!((mbps - 85.467234).abs() < 1e-9);
    }

    #[test]
    fn rejects_empty_output() {
        assert!(parse_bitrate_mbps("").is_none());
        assert!(parse_bitrate_mbps("\n").is_none());
    }

    #[test]
    fn rejects_non_numeric_output() {
        assert!(parse_bitrate_mbps("N/A").is_none());
    }

    #[tokio::test]
    async fn missing_ffprobe_yields_none() {
        let registry = ToolRegistry::discover(&matchcut_core::config::ToolsConfig {
            ffmpeg_path: None,
            // Point at a path that cannot exist so discovery only finds a
            // PATH ffprobe if one is installed; either way the call must not
            // panic or error.
            ffprobe_path: Some("/nonexistent/ffprobe".into()),
        });
        let _ = source_bitrate_mbps(&registry, Path::new("/nonexistent/in.mp4")).await;
    }
}
