//! Parallel offsets and band rings for waterline masks.
//!
//! Model
//! - Each segment gets a unit normal on the requested side. End vertices move
//!   along their segment's normal; interior vertices use a mitred join (the
//!   bisector of the two normals), stretched so both adjacent edges stay at
//!   exactly `offset`, and clamped to `miter_limit * offset`.
//! - Consecutive points closer than `DEGENERATE_SEGMENT_EPS` are merged
//!   first, so zero-length segments never produce NaN.
//! - Self-intersections from sharp concave turns are left in place in the
//!   ring. `band_area` never reads the ring: it sums one strip per segment,
//!   adds the mitred wedge on convex joins and removes the strip overlap on
//!   concave joins, so a fold cannot cancel area.

use super::cfg::{DEFAULT_MITER_LIMIT, DEGENERATE_SEGMENT_EPS};
use super::{Point, Side};

/// Drop points that would form zero-length segments.
pub(crate) fn dedup_path(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        match out.last() {
            Some(last) if (p - last).norm() <= DEGENERATE_SEGMENT_EPS => {}
            _ => out.push(p),
        }
    }
    out
}

/// Left-hand unit normal of `d` in image coordinates, signed by `side`.
#[inline]
fn side_normal(d: Point, side: Side) -> Point {
    Point::new(d.y, -d.x) / d.norm() * side.sign()
}

fn offset_deduped(path: &[Point], offset: f64, side: Side, miter_limit: f64) -> Vec<Point> {
    if path.len() < 2 {
        return Vec::new();
    }
    let normals: Vec<Point> = path
        .windows(2)
        .map(|w| side_normal(w[1] - w[0], side))
        .collect();
    let limit = if miter_limit.is_finite() && miter_limit >= 1.0 {
        miter_limit
    } else {
        1.0
    };
    let last = path.len() - 1;
    let mut out = Vec::with_capacity(path.len());
    out.push(path[0] + normals[0] * offset);
    for k in 1..last {
        let (n_in, n_out) = (normals[k - 1], normals[k]);
        let bisector = n_in + n_out;
        let norm = bisector.norm();
        let shift = if norm <= DEGENERATE_SEGMENT_EPS {
            // full reversal: no bisector, push straight out along the next edge
            n_out * offset
        } else {
            let dir = bisector / norm;
            let cos_half = dir.dot(&n_out);
            let stretch = (1.0 / cos_half).min(limit);
            dir * (offset * stretch)
        };
        out.push(path[k] + shift);
    }
    out.push(path[last] + normals[last - 1] * offset);
    out
}

/// Parallel polyline at distance `offset` on `side`, with the default miter clamp.
///
/// Returns one point per non-degenerate vertex; empty when fewer than two
/// distinct points remain.
pub fn offset_polyline(points: &[Point], offset: f64, side: Side) -> Vec<Point> {
    offset_polyline_with(points, offset, side, DEFAULT_MITER_LIMIT)
}

/// `offset_polyline` with an explicit miter clamp (values below 1 act as 1).
pub fn offset_polyline_with(
    points: &[Point],
    offset: f64,
    side: Side,
    miter_limit: f64,
) -> Vec<Point> {
    offset_deduped(&dedup_path(points), offset, side, miter_limit)
}

/// Closed band ring: the centerline followed by its reversed offset.
///
/// Empty when the centerline has fewer than two distinct points.
pub fn band_polygon(points: &[Point], offset: f64, side: Side, miter_limit: f64) -> Vec<Point> {
    let path = dedup_path(points);
    let far = offset_deduped(&path, offset, side, miter_limit);
    if far.is_empty() {
        return Vec::new();
    }
    let mut ring = path;
    ring.extend(far.into_iter().rev());
    ring
}

/// Area swept by a band of height `offset` on `side` of `points`.
///
/// Strips contribute `segment length * offset`. A convex join adds the mitred
/// kite between neighbouring strips (`offset² * stretch * sin(θ/2)`); a concave
/// join removes the doubly covered kite (`offset² * tan(θ/2)`), with the offset
/// used for that correction capped at a quarter of the shorter neighbour over
/// `tan(θ/2)`. Matches the ring's area while the ring is simple and strictly
/// increases with `offset` past that point.
pub fn band_area(points: &[Point], offset: f64, side: Side, miter_limit: f64) -> f64 {
    let path = dedup_path(points);
    if path.len() < 2 || !(offset.is_finite() && offset > 0.0) {
        return 0.0;
    }
    let limit = if miter_limit.is_finite() && miter_limit >= 1.0 {
        miter_limit
    } else {
        1.0
    };
    let dirs: Vec<Point> = path.windows(2).map(|w| w[1] - w[0]).collect();
    let mut area: f64 = dirs.iter().map(|d| d.norm() * offset).sum();
    for k in 1..dirs.len() {
        let (d_in, d_out) = (dirs[k - 1], dirs[k]);
        let n_in = side_normal(d_in, side);
        let n_out = side_normal(d_out, side);
        let cos_turn = n_in.dot(&n_out).clamp(-1.0, 1.0);
        if 1.0 + cos_turn <= DEGENERATE_SEGMENT_EPS {
            // full reversal: both kites collapse to a segment
            continue;
        }
        let sin_half = ((1.0 - cos_turn) * 0.5).sqrt();
        let cos_half = ((1.0 + cos_turn) * 0.5).sqrt();
        if n_in.dot(&d_out) > 0.0 {
            let tan_half = sin_half / cos_half;
            let cap = d_in.norm().min(d_out.norm()) / (4.0 * tan_half);
            let o = offset.min(cap);
            area -= o * o * tan_half;
        } else {
            let stretch = (1.0 / cos_half).min(limit);
            area += offset * offset * stretch * sin_half;
        }
    }
    area
}
