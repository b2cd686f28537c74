//! Four-point ground-plane pose and the click collector that feeds it.
//!
//! Conventions
//! - Corners are taken in click order, expected clockwise on screen:
//!   edges 0→1 and 2→3 are the "width" edges, 1→2 and 3→0 the "height" edges.
//! - Counter-clockwise input is accepted; the basis simply follows the clicks.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalibrationFault, Result};
use crate::geom::{cfg::COINCIDENT_EPS, distance, Point};

use super::solvers::unit_square_homography;
use super::types::{Calibration, Reference};

/// Plane pose recovered from four ground clicks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanePose {
    pub corners: [Point; 4],
    pub center: Point,
    /// Mean of the two width edges, in pixels.
    pub width_px: f64,
    /// Mean of the two height edges, in pixels.
    pub height_px: f64,
    /// Unit axis along the width edges.
    pub axis_u: Point,
    /// Unit axis along the height edges, orthogonal to `axis_u`.
    pub axis_v: Point,
    /// Unit square → image homography.
    pub homography: Matrix3<f64>,
}

#[inline]
fn cross(a: Point, b: Point, c: Point) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

impl PlanePose {
    pub fn from_corners(corners: [Point; 4]) -> Result<Self> {
        if corners.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(CalibrationFault::NonFinite.into());
        }
        // every consecutive triple must turn, or the quad has collapsed
        for i in 0..4 {
            let turn = cross(corners[i], corners[(i + 1) % 4], corners[(i + 2) % 4]);
            if turn.abs() <= COINCIDENT_EPS {
                return Err(CalibrationFault::DegenerateQuad.into());
            }
        }
        let [c0, c1, c2, c3] = corners;
        let width_px = 0.5 * (distance(c0, c1) + distance(c2, c3));
        let height_px = 0.5 * (distance(c1, c2) + distance(c3, c0));
        let center = (c0 + c1 + c2 + c3) / 4.0;

        let u_raw = (c1 - c0) + (c2 - c3);
        let v_raw = (c3 - c0) + (c2 - c1);
        let u_norm = u_raw.norm();
        if u_norm <= COINCIDENT_EPS {
            return Err(CalibrationFault::DegenerateQuad.into());
        }
        let axis_u = u_raw / u_norm;
        let v_perp = v_raw - axis_u * axis_u.dot(&v_raw);
        let v_norm = v_perp.norm();
        if v_norm <= COINCIDENT_EPS {
            return Err(CalibrationFault::DegenerateQuad.into());
        }
        let axis_v = v_perp / v_norm;

        let homography =
            unit_square_homography(&corners).ok_or(CalibrationFault::DegenerateQuad)?;
        Ok(Self {
            corners,
            center,
            width_px,
            height_px,
            axis_u,
            axis_v,
            homography,
        })
    }

    /// In-image rotation of the width axis, radians.
    pub fn rotation(&self) -> f64 {
        self.axis_u.y.atan2(self.axis_u.x)
    }

    /// Width over height as seen in the image.
    pub fn aspect(&self) -> f64 {
        self.width_px / self.height_px
    }

    /// Unit-square coordinates `(u, v)` → image point.
    pub fn plane_to_image(&self, uv: Point) -> Option<Point> {
        let h = self.homography * Vector3::new(uv.x, uv.y, 1.0);
        (h.z.abs() > f64::EPSILON).then(|| Point::new(h.x / h.z, h.y / h.z))
    }

    /// Image point → unit-square coordinates, `None` on the horizon line.
    pub fn image_to_plane(&self, p: Point) -> Option<Point> {
        let inv = self.homography.try_inverse()?;
        let h = inv * Vector3::new(p.x, p.y, 1.0);
        (h.z.abs() > f64::EPSILON).then(|| Point::new(h.x / h.z, h.y / h.z))
    }

    /// Scalar calibration if the width edges are `width_m` meters long.
    pub fn calibration(&self, width_m: f64) -> Result<Calibration> {
        if !(width_m.is_finite() && width_m > 0.0) {
            return Err(CalibrationFault::Length(width_m).into());
        }
        Calibration::with_reference(
            self.width_px / width_m,
            Reference::GroundPlane {
                corners: self.corners,
                width_m,
            },
        )
    }
}

/// Result of one ground click.
#[derive(Clone, Debug, PartialEq)]
pub enum GroundStep {
    /// Fewer than four corners so far; not an error.
    Pending { collected: usize },
    Ready(PlanePose),
}

/// Collects ground clicks; a fifth click starts over.
#[derive(Clone, Debug, Default)]
pub struct GroundCollector {
    corners: Vec<Point>,
}

impl GroundCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collected(&self) -> &[Point] {
        &self.corners
    }

    pub fn reset(&mut self) {
        self.corners.clear();
    }

    /// Record a click. A degenerate quad is rejected and clears the collector.
    pub fn click(&mut self, p: Point) -> Result<GroundStep> {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Err(CalibrationFault::NonFinite.into());
        }
        if self.corners.len() >= 4 {
            debug!("ground collector restarting");
            self.corners.clear();
        }
        self.corners.push(p);
        if self.corners.len() < 4 {
            return Ok(GroundStep::Pending {
                collected: self.corners.len(),
            });
        }
        let corners = [self.corners[0], self.corners[1], self.corners[2], self.corners[3]];
        match PlanePose::from_corners(corners) {
            Ok(pose) => {
                debug!(
                    width_px = pose.width_px,
                    height_px = pose.height_px,
                    "ground plane ready"
                );
                Ok(GroundStep::Ready(pose))
            }
            Err(err) => {
                self.corners.clear();
                Err(err)
            }
        }
    }
}
