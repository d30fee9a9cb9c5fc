//! Hardware encoder capability probing and profile selection.
//!
//! The host's ffmpeg build is asked once per run which encoders it ships
//! (`ffmpeg -hide_banner -encoders`); the answer is matched against a ranked
//! per-platform candidate list and the first hit wins. Any probe failure --
//! missing binary, timeout, non-zero exit -- degrades to the software
//! fallback, so selection itself never fails.

use std::time::Duration;

use matchcut_core::config::EncodeConfig;
use matchcut_core::EncoderProfile;

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// Encoder listing probe timeout. The listing is printed from static tables,
/// so anything slower than this means ffmpeg is wedged.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// A hardware encoder we know how to configure, in preference order.
struct Candidate {
    /// Encoder name as it appears in the `-encoders` listing.
    encoder: &'static str,
    build: fn() -> EncoderProfile,
}

fn videotoolbox_profile() -> EncoderProfile {
    EncoderProfile {
        codec: "hevc_videotoolbox".into(),
        preset: None,
        crf: None,
        hwaccel_args: vec!["-hwaccel".into(), "videotoolbox".into()],
        extra_args: [
            // Speed-first quality point; VideoToolbox has no presets.
            "-q:v", "70",
            "-prio_speed", "1",
            "-realtime", "0",
            "-power_efficient", "-1",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        bitrate_targeted: false,
    }
}

fn nvenc_profile() -> EncoderProfile {
    EncoderProfile {
        codec: "hevc_nvenc".into(),
        preset: Some("p1".into()),
        crf: None,
        hwaccel_args: vec!["-hwaccel".into(), "cuda".into()],
        extra_args: [
            "-rc:v", "vbr",
            "-b:v", "10M",
            "-maxrate:v", "15M",
            "-bufsize:v", "20M",
            "-spatial_aq", "1",
            "-temporal_aq", "1",
            "-rc-lookahead", "20",
            "-surfaces", "64",
            "-2pass", "0",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        bitrate_targeted: true,
    }
}

/// Software x264 fallback: fast, lower quality, always available.
pub fn software_fallback() -> EncoderProfile {
    EncoderProfile {
        codec: "libx264".into(),
        preset: Some("ultrafast".into()),
        crf: Some(23),
        hwaccel_args: Vec::new(),
        extra_args: Vec::new(),
        bitrate_targeted: false,
    }
}

/// Ranked hardware candidates for the given platform.
fn candidates_for(os: &str) -> Vec<Candidate> {
    match os {
        "macos" => vec![Candidate {
            encoder: "hevc_videotoolbox",
            build: videotoolbox_profile,
        }],
        "linux" | "windows" => vec![Candidate {
            encoder: "hevc_nvenc",
            build: nvenc_profile,
        }],
        _ => Vec::new(),
    }
}

/// Pick the first candidate present in an `-encoders` listing.
fn profile_from_listing(listing: &str, os: &str) -> Option<EncoderProfile> {
    candidates_for(os)
        .into_iter()
        .find(|c| listing.contains(c.encoder))
        .map(|c| (c.build)())
}

/// Select the encoder profile for this run.
///
/// Honors `encode.hw_accel` as an override: `"none"` skips probing and
/// forces the software fallback, `"videotoolbox"`/`"nvenc"` trust the caller
/// and skip the listing probe. Without an override the host is probed and
/// the best supported hardware profile (per [`candidates_for`]) is chosen,
/// falling back to software on any error.
pub async fn select_encoder(tools: &ToolRegistry, config: &EncodeConfig) -> EncoderProfile {
    match config.hw_accel.as_deref() {
        Some("none") => {
            tracing::info!("Hardware acceleration disabled by config; using libx264");
            return software_fallback();
        }
        Some("videotoolbox") => return videotoolbox_profile(),
        Some("nvenc") => return nvenc_profile(),
        _ => {}
    }

    let ffmpeg = match tools.get("ffmpeg") {
        Some(cfg) => cfg,
        None => {
            tracing::warn!("ffmpeg not found during encoder probe; using software fallback");
            return software_fallback();
        }
    };

    let listing = ToolCommand::new(ffmpeg.path.clone())
        .args(["-hide_banner", "-encoders"])
        .timeout(PROBE_TIMEOUT)
        .execute()
        .await;

    match listing {
        Ok(output) => match profile_from_listing(&output.stdout, std::env::consts::OS) {
            Some(profile) => {
                tracing::info!("Hardware encoder detected: {}", profile.codec);
                profile
            }
            None => {
                tracing::info!("No hardware encoder available; using libx264 (ultrafast)");
                software_fallback()
            }
        },
        Err(e) => {
            tracing::warn!("Encoder probe failed ({e}); using software fallback");
            software_fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_WITH_NVENC: &str = "\
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC\n\
 V....D hevc_nvenc           NVIDIA NVENC hevc encoder (codec hevc)\n";

    const LISTING_WITH_VIDEOTOOLBOX: &str = "\
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC\n\
 V....D hevc_videotoolbox    VideoToolbox H.265 Encoder (codec hevc)\n";

    const LISTING_SOFTWARE_ONLY: &str = "\
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC\n";

    #[test]
    fn nvenc_selected_on_linux() {
        let profile = profile_from_listing(LISTING_WITH_NVENC, "linux").unwrap();
        assert_eq!(profile.codec, "hevc_nvenc");
        assert_eq!(profile.preset.as_deref(), Some("p1"));
        assert!(profile.bitrate_targeted);
        assert!(profile.extra_args.contains(&"-rc:v".to_string()));
    }

    #[test]
    fn videotoolbox_selected_on_macos() {
        let profile = profile_from_listing(LISTING_WITH_VIDEOTOOLBOX, "macos").unwrap();
        assert_eq!(profile.codec, "hevc_videotoolbox");
        assert!(profile.preset.is_none());
        assert!(!profile.bitrate_targeted);
    }

    #[test]
    fn nvenc_listing_is_ignored_on_macos() {
        assert!(profile_from_listing(LISTING_WITH_NVENC, "macos").is_none());
    }

    #[test]
    fn software_only_listing_selects_nothing() {
        assert!(profile_from_listing(LISTING_SOFTWARE_ONLY, "linux").is_none());
        assert!(profile_from_listing(LISTING_SOFTWARE_ONLY, "macos").is_none());
    }

    #[test]
    fn unknown_platform_has_no_candidates() {
        assert!(profile_from_listing(LISTING_WITH_NVENC, "freebsd").is_none());
    }

    #[test]
    fn fallback_is_software_crf() {
        let profile = software_fallback();
        assert_eq!(profile.codec, "libx264");
        assert_eq!(profile.preset.as_deref(), Some("ultrafast"));
        assert_eq!(profile.crf, Some(23));
        assert!(profile.hwaccel_args.is_empty());
    }

    #[tokio::test]
    async fn override_none_skips_probe() {
        // An empty registry would normally force the fallback anyway, but the
        // override must short-circuit before any tool lookup.
        let registry = ToolRegistry::discover(&Default::default());
        let config = EncodeConfig {
            hw_accel: Some("none".into()),
            ..Default::default()
        };
        let profile = select_encoder(&registry, &config).await;
        assert_eq!(profile.codec, "libx264");
    }

    #[tokio::test]
    async fn override_nvenc_is_trusted() {
        let registry = ToolRegistry::discover(&Default::default());
        let config = EncodeConfig {
            hw_accel: Some("nvenc".into()),
            ..Default::default()
        };
        let profile = select_encoder(&registry, &config).await;
        assert_eq!(profile.codec, "hevc_nvenc");
    }
}
