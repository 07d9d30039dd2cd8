//! Zero-mean normalized cross-correlation between two zones.

use crate::error::{TrackError, TrackResult};
use crate::zone::Zone;

/// Pearson correlation of the samples of two equally sized zones.
///
/// # Arguments
///
/// * 'a' - reference zone, usually the previous frame's match.
/// * 'b' - candidate zone of the same width and height.
///
/// # Returns
///
/// TrackResult<f64> - a score in [-1, 1]. A zone with zero variance scores
/// 0 against anything. Fails with DimensionMismatch when the sizes differ.
///
pub fn score(a: &Zone, b: &Zone) -> TrackResult<f64> {
    if !a.same_size(b) {
        return Err(TrackError::DimensionMismatch {
            left_width: a.width(),
            left_height: a.height(),
            right_width: b.width(),
            right_height: b.height(),
        });
    }
    if !a.has_variance() || !b.has_variance() {
        return Ok(0.0);
    }

    let (mean_a, mean_b) = (a.mean(), b.mean());
    let covariance_sum: f64 = a
        .samples()
        .as_raw()
        .iter()
        .zip(b.samples().as_raw())
        .map(|(&sa, &sb)| (f64::from(sa) - mean_a) * (f64::from(sb) - mean_b))
        .sum();

    Ok(covariance_sum / (a.pixel_count() as f64 * a.std_dev() * b.std_dev()))
}
