use image::GrayImage;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::candidates::generate_candidates;
use crate::config::TrackerConfig;
use crate::correlation;
use crate::error::{TrackError, TrackResult};
use crate::zone::{Point, Zone};

/// Winning candidate of one tracking step.
#[derive(Debug, Clone)]
pub struct BestMatch {
    pub zone: Zone,
    pub score: f64,
}

/// Exhaustive local search for the previous zone in a new frame.
#[derive(Debug, Clone)]
pub struct FrameTracker {
    radius: u32,
    parallel: bool,
    budget: Option<Duration>,
}

impl FrameTracker {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            radius: config.search_radius,
            parallel: config.parallel,
            budget: config.frame_budget_ms.map(Duration::from_millis),
        }
    }

    /// Sequential tracker with the given radius and no time budget.
    pub fn with_radius(radius: u32) -> Self {
        Self {
            radius,
            parallel: false,
            budget: None,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Finds the candidate in `frame` that best correlates with `previous`.
    ///
    /// # Arguments
    ///
    /// * 'previous' - zone matched in the preceding frame.
    /// * 'frame' - grayscale samples of the current frame.
    ///
    /// # Returns
    ///
    /// TrackResult<BestMatch> - the highest scoring candidate; on equal
    /// scores the first one in row-major search order wins. Fails with
    /// NoValidCandidates when the search window holds no legal anchor, and
    /// with BudgetExceeded when a frame budget is set and overrun.
    ///
    pub fn track_one_frame(&self, previous: &Zone, frame: &GrayImage) -> TrackResult<BestMatch> {
        let start_time = Instant::now();
        let (frame_width, frame_height) = frame.dimensions();
        let candidates = generate_candidates(previous, frame_height, frame_width, self.radius);
        if candidates.is_empty() {
            return Err(TrackError::NoValidCandidates);
        }
        debug!(
            candidates = candidates.len(),
            radius = self.radius,
            "Scoring candidates"
        );

        let score_at = |anchor: &Point| -> TrackResult<f64> {
            let candidate = Zone::at(*anchor, previous.width(), previous.height(), frame)?;
            correlation::score(previous, &candidate)
        };
        let scores: Vec<f64> = if self.parallel {
            candidates.par_iter().map(score_at).collect::<TrackResult<_>>()?
        } else {
            candidates.iter().map(score_at).collect::<TrackResult<_>>()?
        };

        let (best_index, best_score) = first_max(&scores).ok_or(TrackError::NoValidCandidates)?;

        if let Some(budget) = self.budget {
            let elapsed = start_time.elapsed();
            if elapsed > budget {
                return Err(TrackError::BudgetExceeded {
                    budget_ms: budget.as_millis() as u64,
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }
        }

        let zone = Zone::at(
            candidates[best_index],
            previous.width(),
            previous.height(),
            frame,
        )?;
        debug!(
            x = zone.top_left().x,
            y = zone.top_left().y,
            score = best_score,
            "Best candidate"
        );
        Ok(BestMatch {
            zone,
            score: best_score,
        })
    }
}

/// Index and value of the first maximum.
fn first_max(scores: &[f64]) -> Option<(usize, f64)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if score <= best_score => best,
            _ => Some((index, score)),
        })
}
