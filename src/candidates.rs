//! Search window enumeration around the previous zone position.

use crate::zone::{Point, Zone};

/// Anchor positions for the next frame, in row-major order.
pub type CandidateSet = Vec<Point>;

/// Lists every top-left anchor within `radius` pixels (per axis) of the
/// previous zone's anchor such that a rectangle of the zone's size stays
/// entirely inside a `frame_width` x `frame_height` frame.
///
/// Rows (dy) are the outer loop and columns (dx) the inner loop, both
/// ascending. The set is empty when nothing fits.
pub fn generate_candidates(
    previous: &Zone,
    frame_height: u32,
    frame_width: u32,
    radius: u32,
) -> CandidateSet {
    anchors_around(
        previous.top_left(),
        previous.width(),
        previous.height(),
        frame_height,
        frame_width,
        radius,
    )
}

/// Same enumeration as [`generate_candidates`], from a bare anchor and size.
pub fn anchors_around(
    anchor: Point,
    zone_width: u32,
    zone_height: u32,
    frame_height: u32,
    frame_width: u32,
    radius: u32,
) -> CandidateSet {
    let r = i64::from(radius);
    let max_x = i64::from(frame_width) - i64::from(zone_width);
    let max_y = i64::from(frame_height) - i64::from(zone_height);
    if max_x < 0 || max_y < 0 {
        return Vec::new();
    }

    let clamp_range = |center: u32, max: i64| {
        let center = i64::from(center);
        ((center - r).max(0), (center + r).min(max))
    };
    let (x0, x1) = clamp_range(anchor.x, max_x);
    let (y0, y1) = clamp_range(anchor.y, max_y);

    // Coordinates in range are within [0, frame size), so the casts are lossless.
    (y0..=y1)
        .flat_map(|y| (x0..=x1).map(move |x| Point::new(x as u32, y as u32)))
        .collect()
}
