//! Mask values.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryFault, Result};
use crate::geom::{Bounds, Point, Polygon, Polyline};

/// Stable mask identity, generated when a mask is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskId(pub u64);

impl fmt::Display for MaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskKind {
    Area,
    Linear,
    WaterlineBand,
}

/// Mask geometry, tagged by `type` on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Area {
        polygon: Polygon,
    },
    Linear {
        polyline: Polyline,
    },
    /// The band itself is derived at read time from the centerline,
    /// the height and the active calibration.
    WaterlineBand {
        polyline: Polyline,
        band_height_m: f64,
    },
}

impl Shape {
    /// Waterline shape with a checked band height.
    pub fn waterline(polyline: Polyline, band_height_m: f64) -> Result<Self> {
        check_band_height(band_height_m)?;
        Ok(Shape::WaterlineBand {
            polyline,
            band_height_m,
        })
    }

    pub fn kind(&self) -> MaskKind {
        match self {
            Shape::Area { .. } => MaskKind::Area,
            Shape::Linear { .. } => MaskKind::Linear,
            Shape::WaterlineBand { .. } => MaskKind::WaterlineBand,
        }
    }

    pub fn points(&self) -> &[Point] {
        match self {
            Shape::Area { polygon } => polygon.points(),
            Shape::Linear { polyline } | Shape::WaterlineBand { polyline, .. } => {
                polyline.points()
            }
        }
    }

    pub fn band_height_m(&self) -> Option<f64> {
        match self {
            Shape::WaterlineBand { band_height_m, .. } => Some(*band_height_m),
            _ => None,
        }
    }

    /// Checks that serde cannot express on its own.
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Shape::WaterlineBand { band_height_m, .. } => check_band_height(*band_height_m),
            _ => Ok(()),
        }
    }
}

pub(crate) fn check_band_height(h: f64) -> Result<()> {
    if h.is_finite() && h > 0.0 {
        Ok(())
    } else {
        Err(GeometryFault::BandHeight(h).into())
    }
}

/// What the drawing machine hands to the store on commit.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskDraft {
    pub shape: Shape,
    pub material_id: Option<String>,
}

impl MaskDraft {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            material_id: None,
        }
    }

    pub fn with_material(mut self, material_id: impl Into<String>) -> Self {
        self.material_id = Some(material_id.into());
        self
    }
}

/// A committed mask.
///
/// Fields are read-only to consumers; geometry changes only through
/// `MaskStore::replace_geometry`, which installs a new value and bumps both
/// `updated_at` and `revision`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    id: MaskId,
    #[serde(flatten)]
    shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    material_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Bumped on every change; part of the metrics memo key.
    #[serde(default)]
    revision: u64,
}

impl Mask {
    pub(crate) fn from_draft(id: MaskId, draft: MaskDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            shape: draft.shape,
            material_id: draft.material_id,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> MaskId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> MaskKind {
        self.shape.kind()
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material_id(&self) -> Option<&str> {
        self.material_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Pixel-space bounds of the stored points (bands not included).
    pub fn bounds(&self) -> Option<Bounds> {
        crate::geom::bounds(self.shape.points())
    }

    pub(crate) fn set_shape(&mut self, shape: Shape, now: DateTime<Utc>) -> Shape {
        let prev = std::mem::replace(&mut self.shape, shape);
        self.touch(now);
        prev
    }

    pub(crate) fn set_material(
        &mut self,
        material_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let prev = std::mem::replace(&mut self.material_id, material_id);
        self.touch(now);
        prev
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
        self.revision += 1;
    }
}
