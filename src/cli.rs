use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "matchcut")]
#[command(author, version, about = "Scoreboard overlay automation for match videos")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Overlay scores onto timeline clips and build the final video
    Run {
        /// Timeline export (XML) with the clip in/out points
        #[arg(long)]
        timeline: PathBuf,

        /// Score sheet (.xlsx) with one row per point
        #[arg(long)]
        scores: PathBuf,

        /// Output video file
        #[arg(short, long, default_value = "output_final.mp4")]
        output: PathBuf,

        /// Directory containing the clip source files
        #[arg(long)]
        video_dir: Option<PathBuf>,

        /// Team 1 names, shown on the top row ("NAME / NAME")
        #[arg(long)]
        team1: Option<String>,

        /// Team 2 names, shown on the bottom row
        #[arg(long)]
        team2: Option<String>,

        /// Concurrent encoder invocations (default 3)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Render a single scoreboard overlay PNG
    Overlay {
        /// Output image file
        #[arg(short, long, default_value = "overlay.png")]
        output: PathBuf,

        /// Current games, "a/b"
        #[arg(long, default_value = "3/3")]
        games: String,

        /// Current points, "a/b"
        #[arg(long, default_value = "40/30")]
        points: String,

        /// Completed set 1 score, "a/b"
        #[arg(long)]
        set1: Option<String>,

        /// Completed set 2 score, "a/b"
        #[arg(long)]
        set2: Option<String>,

        /// Overlay width in pixels
        #[arg(long, default_value_t = 3840)]
        width: u32,

        /// Overlay height in pixels
        #[arg(long, default_value_t = 2160)]
        height: u32,

        /// Team 1 names
        #[arg(long)]
        team1: Option<String>,

        /// Team 2 names
        #[arg(long)]
        team2: Option<String>,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Show the encoder profile this host would use
    Encoders,
}
