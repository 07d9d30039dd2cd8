//! Error types for the tracking engine and its collaborators.

use std::path::PathBuf;

/// Top-level error type for tracking operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Zone size mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },

    #[error("No valid candidate position inside the frame within the search radius")]
    NoValidCandidates,

    #[error("Frame budget of {budget_ms} ms exceeded after {elapsed_ms} ms")]
    BudgetExceeded { budget_ms: u64, elapsed_ms: u64 },

    #[error("No zone selected. Select the zone to track in the first image before tracking")]
    NoInitialSelection,

    #[error("Zone corner ({x}, {y}) lies outside the {width}x{height} frame")]
    ZoneOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Failed to load frame {path}: {source}")]
    FrameLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Frame {index} is not available, the sequence has {frames} frames")]
    FrameUnavailable { index: usize, frames: usize },

    #[error("Frame {index} ({frame}) failed: {source}")]
    FrameFailed {
        index: usize,
        frame: String,
        source: Box<TrackError>,
    },

    #[error("No image files found in {path}")]
    EmptyFrameDirectory { path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Result sink error: {message}")]
    Sink { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Result type alias using TrackError.
pub type TrackResult<T> = Result<T, TrackError>;

impl TrackError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink {
            message: msg.into(),
        }
    }

    /// Per-frame failures a caller may skip without losing the track.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoValidCandidates | Self::BudgetExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(TrackError::NoValidCandidates.is_recoverable());
        assert!(TrackError::BudgetExceeded {
            budget_ms: 5,
            elapsed_ms: 9
        }
        .is_recoverable());
        assert!(!TrackError::NoInitialSelection.is_recoverable());
        assert!(!TrackError::config("bad radius").is_recoverable());
    }

    #[test]
    fn test_frame_failed_names_the_frame() {
        let err = TrackError::FrameFailed {
            index: 3,
            frame: "targets/0003.png".to_string(),
            source: Box::new(TrackError::NoValidCandidates),
        };
        let msg = err.to_string();
        assert!(msg.contains("Frame 3"));
        assert!(msg.contains("targets/0003.png"));
        assert!(msg.contains("No valid candidate"));
    }
}
