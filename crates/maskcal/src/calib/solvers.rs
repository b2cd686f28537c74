//! Numeric solvers behind the two calibration modes.

use nalgebra::{Matrix3, SMatrix, SVector};

use crate::error::{CalibrationFault, Result};
use crate::geom::{cfg::COINCIDENT_EPS, distance, Point};

use super::types::{Calibration, Reference};

fn finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// `pixels_per_meter = |p1 - p2| / length_m`.
///
/// Fails for non-positive (or non-finite) lengths and for points closer than
/// the coincidence tolerance.
pub fn solve_two_point(p1: Point, p2: Point, length_m: f64) -> Result<Calibration> {
    if !(finite(p1) && finite(p2)) {
        return Err(CalibrationFault::NonFinite.into());
    }
    if !(length_m.is_finite() && length_m > 0.0) {
        return Err(CalibrationFault::Length(length_m).into());
    }
    let px = distance(p1, p2);
    if px <= COINCIDENT_EPS {
        return Err(CalibrationFault::CoincidentPoints.into());
    }
    Calibration::with_reference(px / length_m, Reference::TwoPoint { p1, p2, length_m })
}

/// Projective map sending the unit square `(0,0),(1,0),(1,1),(0,1)` onto
/// `corners` (same order), with `h33 = 1`.
///
/// Solves the 8×8 direct linear system; `None` when it is singular or the
/// result is not finite.
pub fn unit_square_homography(corners: &[Point; 4]) -> Option<Matrix3<f64>> {
    const UV: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for (k, (&(u, v), p)) in UV.iter().zip(corners.iter()).enumerate() {
        let (x, y) = (p.x, p.y);
        let r = 2 * k;
        // x = (h0 u + h1 v + h2) / (h6 u + h7 v + 1)
        a[(r, 0)] = u;
        a[(r, 1)] = v;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -v * x;
        b[r] = x;
        // y = (h3 u + h4 v + h5) / (h6 u + h7 v + 1)
        a[(r + 1, 3)] = u;
        a[(r + 1, 4)] = v;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -u * y;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = y;
    }
    let h = a.lu().solve(&b)?;
    if h.iter().any(|c| !c.is_finite()) {
        return None;
    }
    let m = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
    if m.determinant().abs() <= f64::EPSILON {
        return None;
    }
    Some(m)
}
