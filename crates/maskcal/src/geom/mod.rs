//! Geometry kernel: stateless 2D routines on `f64` points.
//!
//! Purpose
//! - Area, length, offsets and hit tests shared by drawing, metrics and the
//!   eraser. Unit-agnostic: callers pass pixels or meters and get the same
//!   unit back.
//!
//! Assumptions and conventions
//! - Points are `nalgebra::Vector2<f64>` in image space (x right, y down).
//! - Polygons are implicitly closed; polylines are open.
//! - No tolerance is applied unless a constant in `cfg` says so.
//!
//! Code cross-refs: `Polygon`, `Polyline`, `offset_polyline`, `band_polygon`.

pub mod cfg;
mod kernel;
mod offset;
mod types;

pub use kernel::{
    bounds, distance, distance_to_polyline, nearest_on_segment, point_in_polygon, polygon_area,
    polyline_length, ring_perimeter, signed_area,
};
pub use offset::{band_area, band_polygon, offset_polyline, offset_polyline_with};
pub use types::{Bounds, Polygon, Polyline, Side};

/// Image-space point (pixels).
pub type Point = nalgebra::Vector2<f64>;
