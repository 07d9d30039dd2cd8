//! Result sinks: progress logging, trajectory recording and annotated
//! frame output.

use ab_glyph::{FontVec, PxScale};
use image::Rgb;
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::AnnotationConfig;
use crate::error::{TrackError, TrackResult};
use crate::frames::ImageDirectory;
use crate::sequence::{FrameMatch, ResultSink};

/// Collects every match of a run.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryRecorder {
    matches: Vec<FrameMatch>,
}

impl TrajectoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self) -> &[FrameMatch] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<FrameMatch> {
        self.matches
    }

    /// Writes the trajectory as a pretty JSON array.
    pub fn write_json(&self, path: &Path) -> TrackResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(&self.matches)?)?;
        info!("Trajectory saved to: {}", path.display());
        Ok(())
    }

    /// Saves the trajectory after a run, partial or not, and hands back the
    /// run's outcome. When the run already failed, a failed save is only
    /// logged so the tracking error is the one returned.
    pub fn save_after<T>(&self, path: &Path, outcome: TrackResult<T>) -> TrackResult<T> {
        match (self.write_json(path), outcome) {
            (Ok(()), outcome) => outcome,
            (Err(e), Ok(_)) => Err(e),
            (Err(e), Err(tracking)) => {
                warn!(path = %path.display(), error = %e, "Failed to save partial trajectory");
                Err(tracking)
            }
        }
    }
}

impl ResultSink for TrajectoryRecorder {
    fn emit(&mut self, result: &FrameMatch) -> TrackResult<()> {
        self.matches.push(result.clone());
        Ok(())
    }
}

/// Logs one progress line per committed frame.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    last_index: usize,
    logged: usize,
}

impl ProgressLog {
    /// `frame_count` is the length of the whole sequence, frame 0 included.
    pub fn new(frame_count: usize) -> Self {
        Self {
            last_index: frame_count.saturating_sub(1),
            logged: 0,
        }
    }

    pub fn logged(&self) -> usize {
        self.logged
    }
}

impl ResultSink for ProgressLog {
    fn emit(&mut self, result: &FrameMatch) -> TrackResult<()> {
        info!(
            frame = %result.frame,
            "Frame {}/{}: {} -> {} (score {:.4})",
            result.index,
            self.last_index,
            result.top_left,
            result.bottom_right,
            result.score
        );
        self.logged += 1;
        Ok(())
    }
}

/// Draws the best rectangle on each colour frame and saves it.
pub struct AnnotatedFrameWriter {
    frames: ImageDirectory,
    output_dir: PathBuf,
    color: Rgb<u8>,
    font: Option<FontVec>,
    scale: PxScale,
}

impl AnnotatedFrameWriter {
    /// Creates `output_dir` and loads the label font, if one is configured.
    pub fn new(
        frames: ImageDirectory,
        output_dir: impl Into<PathBuf>,
        config: &AnnotationConfig,
    ) -> TrackResult<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;

        let font = match &config.font {
            Some(path) => {
                let bytes = fs::read(path)?;
                let font = FontVec::try_from_vec(bytes).map_err(|e| {
                    TrackError::config(format!("invalid font {}: {e}", path.display()))
                })?;
                Some(font)
            }
            None => None,
        };

        Ok(Self {
            frames,
            output_dir,
            color: Rgb(config.color),
            font,
            scale: PxScale::from(config.font_scale),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn output_path(&self, index: usize) -> TrackResult<PathBuf> {
        let name = self
            .frames
            .path(index)
            .and_then(Path::file_name)
            .ok_or_else(|| TrackError::sink(format!("no file name for frame {index}")))?;
        Ok(self.output_dir.join(name))
    }
}

impl ResultSink for AnnotatedFrameWriter {
    fn emit(&mut self, result: &FrameMatch) -> TrackResult<()> {
        let mut canvas = self.frames.load_color(result.index)?.to_rgb8();

        let width = result.bottom_right.x - result.top_left.x + 1;
        let height = result.bottom_right.y - result.top_left.y + 1;
        let rect = Rect::at(result.top_left.x as i32, result.top_left.y as i32).of_size(width, height);
        draw_hollow_rect_mut(&mut canvas, rect, self.color);

        if let Some(font) = &self.font {
            let label_y = (result.top_left.y as i32 - self.scale.y.ceil() as i32).max(0);
            draw_text_mut(
                &mut canvas,
                self.color,
                result.top_left.x as i32,
                label_y,
                self.scale,
                font,
                &format!("{:.3}", result.score),
            );
        }

        let output_path = self.output_path(result.index)?;
        canvas.save(&output_path)?;
        debug!("Annotated frame saved to: {}", output_path.display());
        Ok(())
    }
}
