//! Area, length, distance and containment.

use crate::error::{GeometryFault, Result};

use super::types::Bounds;
use super::Point;

#[inline]
pub(crate) fn require(points: &[Point], need: usize) -> Result<()> {
    if points.len() < need {
        return Err(GeometryFault::TooFewPoints {
            need,
            got: points.len(),
        }
        .into());
    }
    Ok(())
}

/// Twice the signed area (shoelace sum). Caller guarantees `len >= 3`.
#[inline]
pub(crate) fn shoelace(points: &[Point]) -> f64 {
    let n = points.len();
    let mut acc = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        acc += p.x * q.y - q.x * p.y;
    }
    acc
}

#[inline]
pub(crate) fn open_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Euclidean distance.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).norm()
}

/// Signed polygon area.
///
/// Positive when the vertices run counter-clockwise in a y-up frame, which is
/// clockwise on screen (image y points down).
pub fn signed_area(points: &[Point]) -> Result<f64> {
    require(points, 3)?;
    Ok(0.5 * shoelace(points))
}

/// Unsigned polygon area (shoelace). Winding does not matter.
pub fn polygon_area(points: &[Point]) -> Result<f64> {
    signed_area(points).map(f64::abs)
}

/// Sum of consecutive segment lengths of an open polyline.
pub fn polyline_length(points: &[Point]) -> Result<f64> {
    require(points, 2)?;
    Ok(open_length(points))
}

/// Perimeter of a closed ring (includes the closing edge).
pub fn ring_perimeter(points: &[Point]) -> Result<f64> {
    require(points, 3)?;
    let closing = distance(points[points.len() - 1], points[0]);
    Ok(open_length(points) + closing)
}

/// Ray-casting containment test.
///
/// Edge crossings use the half-open rule `(yi > y) != (yj > y)`, so a point
/// on an edge gets the same answer for identical input every time. Fewer than
/// three vertices never contain anything.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Closest point to `point` on segment `[a, b]`.
pub fn nearest_on_segment(point: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f64::EPSILON {
        return a;
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `point` to the nearest point of an open polyline.
///
/// `None` for an empty slice; a single point degrades to point distance.
pub fn distance_to_polyline(point: Point, points: &[Point]) -> Option<f64> {
    match points {
        [] => None,
        [only] => Some(distance(point, *only)),
        _ => points
            .windows(2)
            .map(|w| distance(point, nearest_on_segment(point, w[0], w[1])))
            .reduce(f64::min),
    }
}

/// Axis-aligned bounds, `None` for an empty slice.
pub fn bounds(points: &[Point]) -> Option<Bounds> {
    let (first, rest) = points.split_first()?;
    let mut min = *first;
    let mut max = *first;
    for p in rest {
        min = min.inf(p);
        max = max.sup(p);
    }
    Some(Bounds { min, max })
}
