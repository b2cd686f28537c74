//! Metrics projector: pixel geometry + calibration → physical quantities.
//!
//! Purpose
//! - Produce `area_m2`, `perimeter_m` and `band_area_m2` for a mask on demand,
//!   memoized on `(mask id, mask revision, calibration id)`.
//! - Sum quantities per material for the external costing step.
//!
//! Assumptions and conventions
//! - Without a calibration every field is `None`; callers show a placeholder.
//! - Length scales by `1/ppm`, area by `1/ppm²`.

mod project;
mod totals;

pub use project::{project, MaskMetrics, MetricsProjector};
pub use totals::MaterialTotals;

#[cfg(test)]
mod tests;
