//! Tolerance defaults for the kernel (internal).
//!
//! Policy
//! - Fixed constants; the kernel stays exact apart from the spots below.

/// Reference points closer than this (pixels) count as coincident.
pub(crate) const COINCIDENT_EPS: f64 = 1e-9;
/// Segments shorter than this are skipped when offsetting.
pub(crate) const DEGENERATE_SEGMENT_EPS: f64 = 1e-12;
/// Default miter clamp, in multiples of the offset distance.
pub const DEFAULT_MITER_LIMIT: f64 = 4.0;
