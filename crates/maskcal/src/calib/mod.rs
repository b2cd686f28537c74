//! Calibration solver: pixels to meters.
//!
//! Purpose
//! - Two-point mode: a drawn reference of known length gives a scalar
//!   pixels-per-meter.
//! - Four-point mode: four clockwise ground clicks give a plane pose (center,
//!   averaged width/height, orientation basis, homography) for 3D placement.
//!
//! Why one canonical form
//! - `Calibration` is always the scalar. The plane pose converts into it via
//!   `PlanePose::calibration(width_m)`, so metrics never consult two sources.
//!
//! Code cross-refs: `Calibration`, `PlanePose`, `GroundCollector`.

mod ground;
mod solvers;
mod types;

pub use ground::{GroundCollector, GroundStep, PlanePose};
pub use solvers::{solve_two_point, unit_square_homography};
pub use types::{ActiveCalibration, Calibration, CalibrationId, Reference};

#[cfg(test)]
mod tests;
