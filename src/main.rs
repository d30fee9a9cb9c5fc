mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use matchcut::pipeline::{format_duration, Pipeline};
use matchcut_av::{encoder, ToolRegistry};
use matchcut_core::config::Config;
use matchcut_core::{ProgressEvent, ProgressSink};
use matchcut_overlay::{ScoreboardRenderer, Scoreline};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "matchcut=trace,matchcut_av=trace,matchcut_parse=debug,matchcut_overlay=debug"
                .to_string()
        } else {
            "matchcut=info,matchcut_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    let mut config = Config::load_or_default(cli.config.as_deref());
    for warning in config.validate() {
        tracing::warn!("Config: {warning}");
    }

    match cli.command {
        Commands::Run {
            timeline,
            scores,
            output,
            video_dir,
            team1,
            team2,
            jobs,
        } => {
            if let Some(dir) = video_dir {
                config.video.video_dir = dir;
            }
            if let Some(names) = team1 {
                config.teams.team1 = names;
            }
            if let Some(names) = team2 {
                config.teams.team2 = names;
            }
            if let Some(jobs) = jobs {
                config.encode.concurrency = jobs;
            }

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_pipeline(config, &timeline, &scores, &output))
        }
        Commands::Overlay {
            output,
            games,
            points,
            set1,
            set2,
            width,
            height,
            team1,
            team2,
        } => render_overlay(
            &config, &output, games, points, set1, set2, width, height, team1, team2,
        ),
        Commands::CheckTools => check_tools(&config),
        Commands::Encoders => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(show_encoder(&config))
        }
    }
}

async fn run_pipeline(
    config: Config,
    timeline: &Path,
    scores: &Path,
    output: &Path,
) -> Result<()> {
    let progress: ProgressSink = Arc::new(|event: ProgressEvent| match event {
        ProgressEvent::RunStarted { pairs } => {
            println!("Processing {pairs} segments...");
        }
        ProgressEvent::SegmentStarted { index, clip } => {
            println!("[{}] {clip}", index + 1);
        }
        ProgressEvent::SegmentFinished {
            index,
            elapsed_secs,
            avg_secs,
            eta_secs,
            ..
        } => {
            println!(
                "[{}] done in {} (avg {}/segment, about {} remaining)",
                index + 1,
                format_duration(elapsed_secs),
                format_duration(avg_secs),
                format_duration(eta_secs),
            );
        }
        ProgressEvent::SegmentSkipped { index, clip, reason } => {
            println!("[{}] skipped {clip}: {reason}", index + 1);
        }
        ProgressEvent::SegmentFailed { index, clip, error } => {
            println!("[{}] failed {clip}: {error}", index + 1);
        }
        ProgressEvent::ConcatStarted { segments } => {
            println!("Concatenating {segments} segments...");
        }
        ProgressEvent::RunFinished {
            written,
            skipped,
            elapsed_secs,
        } => {
            println!(
                "{written} segments written, {skipped} skipped, total {}",
                format_duration(elapsed_secs)
            );
        }
    });

    let pipeline = Pipeline::with_progress(config, progress).await?;
    println!("Encoder: {}", pipeline.profile().codec);

    let summary = pipeline.run(timeline, scores, output).await?;
    println!("Final video created: {}", summary.output.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render_overlay(
    config: &Config,
    output: &PathBuf,
    games: String,
    points: String,
    set1: Option<String>,
    set2: Option<String>,
    width: u32,
    height: u32,
    team1: Option<String>,
    team2: Option<String>,
) -> Result<()> {
    let renderer = ScoreboardRenderer::new(width, height)?;
    let line = Scoreline {
        team1: team1.unwrap_or_else(|| config.teams.team1.clone()),
        team2: team2.unwrap_or_else(|| config.teams.team2.clone()),
        games,
        points,
        set1,
        set2,
    };

    renderer.render_to_file(&line, output)?;
    println!("Overlay written to {}", output.display());
    Ok(())
}

fn check_tools(config: &Config) -> Result<()> {
    println!("Checking external tools...\n");

    let registry = ToolRegistry::discover(&config.tools);
    let mut all_ok = true;

    for tool in registry.check_all() {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({version})");
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them to enable all features.");
    }

    Ok(())
}

async fn show_encoder(config: &Config) -> Result<()> {
    let registry = ToolRegistry::discover(&config.tools);
    let profile = encoder::select_encoder(&registry, &config.encode).await;

    println!("Selected encoder: {}", profile.codec);
    if let Some(ref preset) = profile.preset {
        println!("  preset: {preset}");
    }
    if let Some(crf) = profile.crf {
        println!("  crf: {crf}");
    }
    if !profile.hwaccel_args.is_empty() {
        println!("  hwaccel: {}", profile.hwaccel_args.join(" "));
    }
    if !profile.extra_args.is_empty() {
        println!("  extra: {}", profile.extra_args.join(" "));
    }

    Ok(())
}
