//! zone-tracker: follow a selected region through a sequence of images.
//!
//! Usage:
//!   zone-tracker track --select X1,Y1,X2,Y2 [OPTIONS]   Track the region through every frame
//!   zone-tracker inspect --select X1,Y1,X2,Y2            Show the selected region of the first frame

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use zone_tracker::config::{AppConfig, FailurePolicy, Selection};
use zone_tracker::logging::init_logging;

mod commands;

#[derive(Parser)]
#[command(
    name = "zone-tracker",
    about = "Track a rectangular region across an image sequence by normalized correlation",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track the selected region through the frame sequence
    Track {
        #[command(flatten)]
        input: InputArgs,

        /// Directory annotated frames are written to
        #[arg(short, long)]
        results: Option<PathBuf>,

        /// Maximum displacement, per axis, between consecutive frames
        #[arg(long)]
        radius: Option<u32>,

        /// What to do when a frame has no valid candidate: abort|skip
        #[arg(long)]
        policy: Option<FailurePolicy>,

        /// Score candidates on a single thread
        #[arg(long)]
        sequential: bool,

        /// Per-frame search budget in milliseconds
        #[arg(long)]
        budget_ms: Option<u64>,

        /// Font file used to print scores on annotated frames
        #[arg(long)]
        font: Option<PathBuf>,

        /// Write the trajectory as JSON to this file
        #[arg(long)]
        trajectory: Option<PathBuf>,
    },

    /// Show the selected region of the first frame and save its pixels
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        /// Where to save the selected pixels (defaults to <results>/selection.png)
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Directory containing the frames, read in file name order
    #[arg(short, long)]
    frames: Option<PathBuf>,

    /// Region to track in the first frame, as x1,y1,x2,y2 (inclusive corners)
    #[arg(short, long)]
    select: Option<Selection>,
}

impl InputArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(frames) = self.frames {
            config.frames_dir = frames;
        }
        if let Some(selection) = self.select {
            config.selection = Some(selection);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging);

    match cli.command {
        Commands::Track {
            input,
            results,
            radius,
            policy,
            sequential,
            budget_ms,
            font,
            trajectory,
        } => {
            input.apply(&mut config);
            if let Some(results) = results {
                config.results_dir = results;
            }
            if let Some(radius) = radius {
                config.tracker.search_radius = radius;
            }
            if let Some(policy) = policy {
                config.tracker.failure_policy = policy;
            }
            if sequential {
                config.tracker.parallel = false;
            }
            if budget_ms.is_some() {
                config.tracker.frame_budget_ms = budget_ms;
            }
            if font.is_some() {
                config.annotation.font = font;
            }
            commands::track::run(&config, trajectory)
        }
        Commands::Inspect { input, save } => {
            input.apply(&mut config);
            commands::inspect::run(&config, save)
        }
    }
}
