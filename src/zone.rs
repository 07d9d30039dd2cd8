use image::{imageops, GrayImage};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TrackError, TrackResult};

/// Integer pixel coordinate in image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangular block of grayscale samples copied out of one frame.
///
/// Both corners are inclusive. The mean and standard deviation of the
/// samples are computed once at construction; a zone never changes after
/// that.
#[derive(Debug, Clone)]
pub struct Zone {
    top_left: Point,
    bottom_right: Point,
    samples: GrayImage,
    mean: f64,
    std_dev: f64,
}

impl Zone {
    /// Builds the zone spanned by two corners of `frame`.
    ///
    /// # Arguments
    ///
    /// * 'first' - one corner, inclusive.
    /// * 'second' - the opposite corner, inclusive. Order does not matter.
    /// * 'frame' - grayscale source the samples are sliced from.
    ///
    /// # Returns
    ///
    /// TrackResult<Zone> - fails with ZoneOutOfBounds when a corner is not
    /// inside the frame. Corners are never clamped here.
    ///
    pub fn from_corners(first: Point, second: Point, frame: &GrayImage) -> TrackResult<Self> {
        let (width, height) = frame.dimensions();
        for corner in [first, second] {
            if corner.x >= width || corner.y >= height {
                return Err(TrackError::ZoneOutOfBounds {
                    x: corner.x,
                    y: corner.y,
                    width,
                    height,
                });
            }
        }

        let top_left = Point::new(first.x.min(second.x), first.y.min(second.y));
        let bottom_right = Point::new(first.x.max(second.x), first.y.max(second.y));
        let zone_width = bottom_right.x - top_left.x + 1;
        let zone_height = bottom_right.y - top_left.y + 1;

        let samples =
            imageops::crop_imm(frame, top_left.x, top_left.y, zone_width, zone_height).to_image();
        let (mean, std_dev) = sample_statistics(&samples);

        Ok(Self {
            top_left,
            bottom_right,
            samples,
            mean,
            std_dev,
        })
    }

    /// Builds a `width` x `height` zone anchored at `anchor`.
    pub fn at(anchor: Point, width: u32, height: u32, frame: &GrayImage) -> TrackResult<Self> {
        let far = Point::new(
            anchor.x.saturating_add(width.saturating_sub(1)),
            anchor.y.saturating_add(height.saturating_sub(1)),
        );
        Self::from_corners(anchor, far, frame)
    }

    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    pub fn width(&self) -> u32 {
        self.samples.width()
    }

    pub fn height(&self) -> u32 {
        self.samples.height()
    }

    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Row-major grayscale samples, `height` rows of `width` values.
    pub fn samples(&self) -> &GrayImage {
        &self.samples
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation of the samples.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// False for flat regions, which cannot be correlated.
    pub fn has_variance(&self) -> bool {
        self.std_dev != 0.0
    }

    pub fn same_size(&self, other: &Zone) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "from {} to {}, {} * {} ({} pixels)",
            self.top_left,
            self.bottom_right,
            self.width(),
            self.height(),
            self.pixel_count()
        )
    }
}

/// Mean and population standard deviation, accumulated row-major.
fn sample_statistics(samples: &GrayImage) -> (f64, f64) {
    let count = samples.as_raw().len() as f64;
    let sum: f64 = samples.as_raw().iter().map(|&s| f64::from(s)).sum();
    let mean = sum / count;
    let deviation_sum: f64 = samples
        .as_raw()
        .iter()
        .map(|&s| {
            let d = f64::from(s) - mean;
            d * d
        })
        .sum();
    (mean, (deviation_sum / count).sqrt())
}
