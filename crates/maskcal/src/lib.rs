//! Mask geometry and calibration engine.
//!
//! Purpose
//! - Turn freehand pointer input over a site photo into immutable masks
//!   (areas, lines, waterline bands), calibrate pixels to meters, and project
//!   physical quantities (m², m) that an external costing step prices.
//!
//! Layout (leaf-first)
//! - `geom`: stateless kernel (area, length, offsets, hit tests).
//! - `calib`: two-point scale and four-point ground-plane pose.
//! - `store`: ordered masks, selection, bounded undo/redo of inverse records.
//! - `draw`: per-tool pointer state machine and eraser hit-testing.
//! - `metrics`: memoized physical metrics and per-material totals.
//! - `document`: the single owner of all of the above for one open photo.
//!
//! Everything here is synchronous and does no I/O. A host that talks to a
//! document from several threads must funnel calls through one owner.

pub mod calib;
pub mod config;
pub mod document;
pub mod draw;
pub mod error;
pub mod geom;
pub mod metrics;
pub mod store;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::EngineCfg;
pub use document::{Document, PointerOutcome, Snapshot};
pub use error::{CalibrationFault, Error, GeometryFault, Result};
pub use geom::Point;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::calib::{
        ActiveCalibration, Calibration, CalibrationId, GroundCollector, GroundStep, PlanePose,
        Reference,
    };
    pub use crate::config::EngineCfg;
    pub use crate::document::{Document, PointerOutcome, Snapshot};
    pub use crate::draw::{DrawMachine, DrawOutcome, Phase, PointerEvent, Tool};
    pub use crate::error::{Error, Result};
    pub use crate::geom::{Point, Polygon, Polyline, Side};
    pub use crate::metrics::{MaskMetrics, MaterialTotals, MetricsProjector};
    pub use crate::store::{Mask, MaskDraft, MaskId, MaskKind, MaskStore, Shape};
    pub use nalgebra::Vector2;
}
