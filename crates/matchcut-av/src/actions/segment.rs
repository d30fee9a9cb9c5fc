//! Single-segment extraction, overlay compositing, and encoding.
//!
//! One ffmpeg invocation per segment: seek to the clip's in-point in the
//! source, composite the pre-rendered scoreboard PNG at the origin, and
//! encode the requested duration with the run's encoder profile.

use std::path::PathBuf;
use std::time::Duration;

use matchcut_core::EncoderProfile;

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// Segments run as long as they run; an encoder invocation is only
/// considered wedged after this much wall time.
const ENCODE_TIMEOUT: Duration = Duration::from_secs(86400);

/// Everything needed to encode one segment.
#[derive(Debug, Clone)]
pub struct SegmentJob {
    /// Source media file the clip points into.
    pub source: PathBuf,
    /// Pre-rendered scoreboard overlay (transparent PNG).
    pub overlay: PathBuf,
    /// Destination segment file.
    pub output: PathBuf,
    /// Seek offset into the source, in seconds.
    pub start_secs: f64,
    /// Segment duration, in seconds.
    pub duration_secs: f64,
    /// Detected source bitrate, used to rescale bitrate-targeted profiles.
    pub source_bitrate_mbps: Option<f64>,
    /// AAC bitrate when audio is re-encoded.
    pub audio_bitrate: String,
    /// Stream-copy the source audio instead of re-encoding.
    pub copy_audio: bool,
}

/// Build the full ffmpeg argument list for a segment job.
pub fn segment_args(profile: &EncoderProfile, job: &SegmentJob) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    args.extend(profile.hwaccel_args.iter().cloned());
    args.push("-ss".into());
    args.push(format!("{:.6}", job.start_secs));
    args.push("-i".into());
    args.push(job.source.to_string_lossy().into_owned());
    args.push("-i".into());
    args.push(job.overlay.to_string_lossy().into_owned());
    args.push("-filter_complex".into());
    args.push("[0:v][1:v]overlay=0:0[v]".into());
    args.push("-map".into());
    args.push("[v]".into());
    args.push("-map".into());
    args.push("0:a?".into());
    args.push("-t".into());
    args.push(format!("{:.6}", job.duration_secs));
    args.push("-c:v".into());
    args.push(profile.codec.clone());

    if let Some(ref preset) = profile.preset {
        args.push("-preset".into());
        args.push(preset.clone());
    }
    if let Some(crf) = profile.crf {
        args.push("-crf".into());
        args.push(crf.to_string());
    }

    args.extend(rate_args(profile, job.source_bitrate_mbps));

    if job.copy_audio {
        args.push("-c:a".into());
        args.push("copy".into());
    } else {
        args.push("-c:a".into());
        args.push("aac".into());
        args.push("-b:a".into());
        args.push(job.audio_bitrate.clone());
    }

    args.push("-y".into());
    args.push(job.output.to_string_lossy().into_owned());
    args
}

/// The profile's extra encoder arguments, with `-b:v`/`-maxrate:v`/`-bufsize:v`
/// rescaled from the detected source bitrate when the profile targets a
/// bitrate: target = source, maxrate = 1.2x, bufsize = 2x.
fn rate_args(profile: &EncoderProfile, source_bitrate_mbps: Option<f64>) -> Vec<String> {
    let Some(mbps) = source_bitrate_mbps.filter(|_| profile.bitrate_targeted) else {
        return profile.extra_args.clone();
    };

    let mut out = Vec::with_capacity(profile.extra_args.len());
    let mut iter = profile.extra_args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-b:v" => {
                iter.next();
                out.push("-b:v".into());
                out.push(format!("{}M", mbps as u64));
            }
            "-maxrate:v" => {
                iter.next();
                out.push("-maxrate:v".into());
                out.push(format!("{}M", (mbps * 1.2) as u64));
            }
            "-bufsize:v" => {
                iter.next();
                out.push("-bufsize:v".into());
                out.push(format!("{}M", (mbps * 2.0) as u64));
            }
            _ => out.push(arg.clone()),
        }
    }
    out
}

/// Encode one segment.
///
/// # Errors
///
/// [`matchcut_core::Error::Tool`] when ffmpeg cannot be spawned or exits
/// non-zero. The orchestrator treats this as a per-segment skip.
pub async fn encode_segment(
    tools: &ToolRegistry,
    profile: &EncoderProfile,
    job: &SegmentJob,
) -> matchcut_core::Result<()> {
    let ffmpeg = tools.require("ffmpeg")?;

    tracing::debug!(
        "Encoding segment {} ({}s + {}s, codec={})",
        job.output.display(),
        job.start_secs,
        job.duration_secs,
        profile.codec,
    );

    ToolCommand::new(ffmpeg.path.clone())
        .args(segment_args(profile, job))
        .timeout(ENCODE_TIMEOUT)
        .execute()
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn software_profile() -> EncoderProfile {
        EncoderProfile {
            codec: "libx264".into(),
            preset: Some("ultrafast".into()),
            crf: Some(23),
            hwaccel_args: Vec::new(),
            extra_args: Vec::new(),
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
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            bitrate_targeted: true,
        }
    }

    fn job() -> SegmentJob {
        SegmentJob {
            source: PathBuf::from("/media/point_001.mp4"),
            overlay: PathBuf::from("/tmp/overlay_001.png"),
            output: PathBuf::from("/tmp/segment_001.mp4"),
            start_secs: 5.005,
            duration_secs: 12.5,
            source_bitrate_mbps: None,
            audio_bitrate: "192k".into(),
            copy_audio: false,
        }
    }

    fn index_of(args: &[String], needle: &str) -> usize {
        args.iter().position(|a| a == needle).unwrap()
    }

    #[test]
    fn software_args_use_crf_and_preset() {
        let args = segment_args(&software_profile(), &job());
        let crf_at = index_of(&args, "-crf");
        assert_eq!(args[crf_at + 1], "23");
        let preset_at = index_of(&args, "-preset");
        assert_eq!(args[preset_at + 1], "ultrafast");
        // Software profile has no hwaccel flags: the seek comes first.
        assert_eq!(args[0], "-ss");
    }

    #[test]
    fn overlay_is_second_input_composited_at_origin() {
        let args = segment_args(&software_profile(), &job());
        let inputs: Vec<&String> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "-i")
            .map(|(i, _)| &args[i + 1])
            .collect();
        assert_eq!(inputs.len(), 2);
        assert!(inputs[0].ends_with("point_001.mp4"));
        assert!(inputs[1].ends_with("overlay_001.png"));
        assert!(args.contains(&"[0:v][1:v]overlay=0:0[v]".to_string()));
    }

    #[test]
    fn hwaccel_flags_precede_inputs() {
        let args = segment_args(&nvenc_profile(), &job());
        assert_eq!(args[0], "-hwaccel");
        assert_eq!(args[1], "cuda");
        assert!(index_of(&args, "-hwaccel") < index_of(&args, "-i"));
    }

    #[test]
    fn bitrate_substitution_rescales_rate_control() {
        let mut j = job();
        j.source_bitrate_mbps = Some(85.4);
        let args = segment_args(&nvenc_profile(), &j);

        let b_at = index_of(&args, "-b:v");
        assert_eq!(args[b_at + 1], "85M");
        let max_at = index_of(&args, "-maxrate:v");
        assert_eq!(args[max_at + 1], "102M");
        let buf_at = index_of(&args, "-bufsize:v");
        assert_eq!(args[buf_at + 1], "170M");
        // Untouched extra args survive the substitution.
        assert!(args.contains(&"-rc:v".to_string()));
        assert!(args.contains(&"vbr".to_string()));
    }

    #[test]
    fn bitrate_ignored_for_non_targeted_profiles() {
        let mut j = job();
        j.source_bitrate_mbps = Some(85.4);
        let args = segment_args(&software_profile(), &j);
        assert!(!args.contains(&"-b:v".to_string()));
    }

    #[test]
    fn defaults_without_probe_keep_profile_rates() {
        let args = segment_args(&nvenc_profile(), &job());
        let b_at = index_of(&args, "-b:v");
        assert_eq!(args[b_at + 1], "10M");
    }

    #[test]
    fn audio_copy_replaces_aac() {
        let mut j = job();
        j.copy_audio = true;
        let args = segment_args(&software_profile(), &j);
        let a_at = index_of(&args, "-c:a");
        assert_eq!(args[a_at + 1], "copy");
        assert!(!args.contains(&"-b:a".to_string()));
    }

    #[test]
    fn output_is_last_and_overwritten() {
        let args = segment_args(&software_profile(), &job());
        assert_eq!(args[args.len() - 2], "-y");
        assert!(args.last().unwrap().ends_with("segment_001.mp4"));
    }
}
