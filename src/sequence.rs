//! Frame-to-frame tracking over an ordered sequence.
//!
//! The driver pulls frames from a [`FrameSource`], runs one tracking step
//! per frame starting from the zone selected in frame 0, and pushes every
//! committed match to a [`ResultSink`]. Frames are strictly sequential:
//! each search starts from the previous frame's match.

use image::GrayImage;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{FailurePolicy, Selection, TrackerConfig};
use crate::error::{TrackError, TrackResult};
use crate::tracker::FrameTracker;
use crate::zone::{Point, Zone};

/// Ordered frames the tracker walks through.
pub trait FrameSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human readable identifier used in logs and errors.
    fn frame_id(&self, index: usize) -> String;

    fn load_grayscale(&self, index: usize) -> TrackResult<GrayImage>;
}

/// Best rectangle committed for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameMatch {
    pub index: usize,
    pub frame: String,
    pub top_left: Point,
    pub bottom_right: Point,
    pub score: f64,
}

/// Receives every committed match, in frame order.
pub trait ResultSink {
    fn emit(&mut self, result: &FrameMatch) -> TrackResult<()>;
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn emit(&mut self, result: &FrameMatch) -> TrackResult<()> {
        (**self).emit(result)
    }
}

impl<A: ResultSink, B: ResultSink> ResultSink for (A, B) {
    fn emit(&mut self, result: &FrameMatch) -> TrackResult<()> {
        self.0.emit(result)?;
        self.1.emit(result)
    }
}

/// Zones threaded from one iteration to the next.
#[derive(Debug, Clone)]
pub struct TrackingState {
    pub previous_zone: Option<Zone>,
    pub current_zone: Option<Zone>,
    pub frame_index: usize,
}

impl TrackingState {
    pub fn new(initial: Zone) -> Self {
        Self {
            previous_zone: None,
            current_zone: Some(initial),
            frame_index: 0,
        }
    }

    /// Zone the next frame is searched from.
    pub fn reference(&self) -> Option<&Zone> {
        self.current_zone.as_ref()
    }

    fn commit(self, frame_index: usize, zone: Zone) -> Self {
        Self {
            previous_zone: self.current_zone,
            current_zone: Some(zone),
            frame_index,
        }
    }

    fn skip(self, frame_index: usize) -> Self {
        Self {
            frame_index,
            ..self
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrackingReport {
    /// Frames with a committed match.
    pub frames_tracked: usize,
    /// Frames skipped under `FailurePolicy::Skip`.
    pub lost_frames: Vec<usize>,
    /// Corners of the last committed zone.
    pub final_zone: Option<(Point, Point)>,
}

/// Builds the frame 0 zone from a user selection.
pub fn select_initial_zone<F: FrameSource + ?Sized>(
    source: &F,
    selection: Option<&Selection>,
) -> TrackResult<Zone> {
    let selection = selection.ok_or(TrackError::NoInitialSelection)?;
    if source.is_empty() {
        return Err(TrackError::config("frame sequence is empty"));
    }
    let first_frame = source.load_grayscale(0)?;
    Zone::from_corners(selection.first, selection.second, &first_frame)
}

pub struct SequenceDriver {
    tracker: FrameTracker,
    policy: FailurePolicy,
}

impl SequenceDriver {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            tracker: FrameTracker::new(config),
            policy: config.failure_policy,
        }
    }

    pub fn with_tracker(tracker: FrameTracker, policy: FailurePolicy) -> Self {
        Self { tracker, policy }
    }

    /// Tracks `initial` through frames 1..N of `source`.
    ///
    /// # Arguments
    ///
    /// * 'source' - ordered frames; frame 0 is where `initial` was selected.
    /// * 'initial' - the selected zone. Nothing is tracked without one.
    /// * 'sink' - receives each committed match.
    ///
    /// # Returns
    ///
    /// TrackResult<TrackingReport> - fails with NoInitialSelection before
    /// touching any frame, with FrameLoad when a frame cannot be read, and
    /// with FrameFailed naming the frame whose search failed (under the
    /// abort policy, or for non-recoverable errors under either policy).
    ///
    pub fn run<F, S>(
        &self,
        source: &F,
        initial: Option<Zone>,
        sink: &mut S,
    ) -> TrackResult<TrackingReport>
    where
        F: FrameSource + ?Sized,
        S: ResultSink + ?Sized,
    {
        let initial = initial.ok_or(TrackError::NoInitialSelection)?;
        let total = source.len();
        let mut report = TrackingReport {
            final_zone: Some((initial.top_left(), initial.bottom_right())),
            ..TrackingReport::default()
        };
        if total < 2 {
            warn!(frames = total, "Need at least two frames to track");
            return Ok(report);
        }

        info!(zone = %initial, frames = total, "Tracking target");
        let mut state = TrackingState::new(initial);

        for index in 1..total {
            let frame = source.load_grayscale(index)?;
            let reference = state.reference().ok_or(TrackError::NoInitialSelection)?;

            match self.tracker.track_one_frame(reference, &frame) {
                Ok(best) => {
                    let result = FrameMatch {
                        index,
                        frame: source.frame_id(index),
                        top_left: best.zone.top_left(),
                        bottom_right: best.zone.bottom_right(),
                        score: best.score,
                    };
                    sink.emit(&result)?;
                    report.frames_tracked += 1;
                    report.final_zone = Some((result.top_left, result.bottom_right));
                    state = state.commit(index, best.zone);
                }
                Err(e) if e.is_recoverable() && self.policy == FailurePolicy::Skip => {
                    warn!(frame = index, error = %e, "Target lost, keeping previous zone");
                    report.lost_frames.push(index);
                    state = state.skip(index);
                }
                Err(e) => {
                    return Err(TrackError::FrameFailed {
                        index,
                        frame: source.frame_id(index),
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::TrajectoryRecorder;
    use image::Luma;

    fn textured_frame(width: u32, height: u32, dx: u32, dy: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let (sx, sy) = (x + 100 - dx, y + 100 - dy);
            Luma([((sx * 31 + sy * 17 + sx * sy * 7) % 241) as u8])
        })
    }

    #[test]
    fn test_no_selection_tracks_nothing() {
        let frames = vec![textured_frame(20, 20, 0, 0); 3];
        let mut recorder = TrajectoryRecorder::new();
        let err = SequenceDriver::new(&TrackerConfig::default())
            .run(frames.as_slice(), None, &mut recorder)
            .unwrap_err();

        assert!(matches!(err, TrackError::NoInitialSelection));
        assert!(recorder.matches().is_empty());
    }

    #[test]
    fn test_select_initial_zone_requires_selection() {
        let frames = vec![textured_frame(20, 20, 0, 0)];
        assert!(matches!(
            select_initial_zone(frames.as_slice(), None),
            Err(TrackError::NoInitialSelection)
        ));

        let selection: Selection = "6,6,2,2".parse().unwrap();
        let zone = select_initial_zone(frames.as_slice(), Some(&selection)).unwrap();
        assert_eq!(zone.top_left(), Point::new(2, 2));
    }

    #[test]
    fn test_single_frame_is_a_no_op() {
        let frames = vec![textured_frame(20, 20, 0, 0)];
        let initial = Zone::from_corners(Point::new(2, 2), Point::new(6, 6), &frames[0]).unwrap();
        let mut recorder = TrajectoryRecorder::new();
        let report = SequenceDriver::new(&TrackerConfig::default())
            .run(frames.as_slice(), Some(initial), &mut recorder)
            .unwrap();

        assert_eq!(report.frames_tracked, 0);
        assert!(recorder.matches().is_empty());
    }

    #[test]
    fn test_follows_steady_motion_through_last_frame() {
        let frames: Vec<GrayImage> = (0..5).map(|i| textured_frame(40, 40, i * 2, i)).collect();
        let initial = Zone::from_corners(Point::new(10, 10), Point::new(16, 15), &frames[0]).unwrap();
        let mut recorder = TrajectoryRecorder::new();
        let report = SequenceDriver::new(&TrackerConfig {
            search_radius: 3,
            ..TrackerConfig::default()
        })
        .run(frames.as_slice(), Some(initial), &mut recorder)
        .unwrap();

        assert_eq!(report.frames_tracked, 4);
        let matches = recorder.matches();
        assert_eq!(matches.len(), 4);
        for (i, m) in matches.iter().enumerate() {
            let step = i as u32 + 1;
            assert_eq!(m.index, i + 1);
            assert_eq!(m.top_left, Point::new(10 + step * 2, 10 + step));
            assert!((m.score - 1.0).abs() < 1e-9);
        }
        assert_eq!(
            report.final_zone,
            Some((Point::new(18, 14), Point::new(24, 19)))
        );
    }

    #[test]
    fn test_state_commit_keeps_previous_zone() {
        let frame = textured_frame(20, 20, 0, 0);
        let a = Zone::from_corners(Point::new(1, 1), Point::new(3, 3), &frame).unwrap();
        let b = Zone::from_corners(Point::new(2, 2), Point::new(4, 4), &frame).unwrap();

        let state = TrackingState::new(a).commit(1, b);
        assert_eq!(state.frame_index, 1);
        assert_eq!(state.previous_zone.unwrap().top_left(), Point::new(1, 1));
        assert_eq!(state.current_zone.unwrap().top_left(), Point::new(2, 2));
    }
}
