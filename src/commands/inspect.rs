//! Show the region selected in the first frame.

use std::path::PathBuf;

use anyhow::Context;
use zone_tracker::config::AppConfig;
use zone_tracker::sequence::select_initial_zone;
use zone_tracker::ImageDirectory;

pub fn run(config: &AppConfig, save: Option<PathBuf>) -> anyhow::Result<()> {
    let frames = ImageDirectory::open(&config.frames_dir, &config.extensions)
        .with_context(|| format!("Failed to list frames in {}", config.frames_dir.display()))?;
    let zone = select_initial_zone(&frames, config.selection.as_ref())?;

    println!("Selected pixels: from {} to {}", zone.top_left(), zone.bottom_right());
    println!(
        "Rectangle size: {} * {} ({} pixels)",
        zone.width(),
        zone.height(),
        zone.pixel_count()
    );
    println!("Mean: {:.3}, standard deviation: {:.3}", zone.mean(), zone.std_dev());
    if !zone.has_variance() {
        println!("Warning: the region is flat and will score 0 against every candidate.");
    }

    let output_path = save.unwrap_or_else(|| config.results_dir.join("selection.png"));
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    zone.samples()
        .save(&output_path)
        .with_context(|| format!("Failed to save {}", output_path.display()))?;
    println!("Selected pixels saved to: {}", output_path.display());

    Ok(())
}
