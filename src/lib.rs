//! Region tracking across image sequences.
//!
//! A rectangle selected in the first frame is followed through the
//! following frames by searching, around its last position, for the
//! same-sized window whose grayscale samples correlate best with it
//! (zero-mean normalized cross-correlation).
//!
//! ## Modules
//! - `zone`: immutable pixel regions and their statistics
//! - `candidates`: search window enumeration
//! - `correlation`: the matching score
//! - `tracker`: one tracking step (search, score, select)
//! - `sequence`: frame-to-frame driver and its collaborator traits
//! - `frames`, `sink`: directory frame source and result outputs

pub mod candidates;
pub mod config;
pub mod correlation;
pub mod error;
pub mod frames;
pub mod logging;
pub mod sequence;
pub mod sink;
pub mod tracker;
pub mod zone;

pub use config::{AppConfig, FailurePolicy, Selection, TrackerConfig};
pub use error::{TrackError, TrackResult};
pub use frames::ImageDirectory;
pub use sequence::{FrameMatch, FrameSource, ResultSink, SequenceDriver, TrackingReport};
pub use sink::{AnnotatedFrameWriter, ProgressLog, TrajectoryRecorder};
pub use tracker::{BestMatch, FrameTracker};
pub use zone::{Point, Zone};
