//! Track the selected region through the frame sequence.

use std::path::PathBuf;

use anyhow::Context;
use zone_tracker::config::AppConfig;
use zone_tracker::sequence::{select_initial_zone, SequenceDriver};
use zone_tracker::{AnnotatedFrameWriter, ImageDirectory, ProgressLog, TrajectoryRecorder};

pub fn run(config: &AppConfig, trajectory: Option<PathBuf>) -> anyhow::Result<()> {
    config.validate()?;

    let frames = ImageDirectory::open(&config.frames_dir, &config.extensions)
        .with_context(|| format!("Failed to list frames in {}", config.frames_dir.display()))?;
    println!(
        "Tracking through {} frames in {}",
        frames.paths().len(),
        config.frames_dir.display()
    );

    let initial = select_initial_zone(&frames, config.selection.as_ref())?;
    println!("Selected pixels: {initial}");

    let writer = AnnotatedFrameWriter::new(frames.clone(), &config.results_dir, &config.annotation)?;
    let progress = ProgressLog::new(frames.paths().len());
    let mut recorder = TrajectoryRecorder::new();
    let mut sinks = (progress, (writer, &mut recorder));

    let driver = SequenceDriver::new(&config.tracker);
    let outcome = driver.run(&frames, Some(initial), &mut sinks);

    drop(sinks);

    let report = match trajectory {
        Some(path) => recorder.save_after(&path, outcome)?,
        None => outcome?,
    };

    println!("  Tracked {} frames", report.frames_tracked);
    if !report.lost_frames.is_empty() {
        println!("  Lost target in frames {:?}", report.lost_frames);
    }
    if let Some((top_left, bottom_right)) = report.final_zone {
        println!("  Final zone: {top_left} to {bottom_right}");
    }
    println!(
        "  Annotated frames saved to: {}",
        config.results_dir.display()
    );

    Ok(())
}
