//! Calibration values and their identity.

use serde::{Deserialize, Serialize};

use crate::error::{CalibrationFault, Error, Result};
use crate::geom::Point;

/// Identity of an installed calibration; fresh for every replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalibrationId(pub u64);

/// Where a scale came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Reference {
    TwoPoint {
        p1: Point,
        p2: Point,
        length_m: f64,
    },
    GroundPlane {
        corners: [Point; 4],
        width_m: f64,
    },
    Manual,
}

/// Scalar pixel-to-meter calibration for one photo.
///
/// Invariant: `pixels_per_meter` is strictly positive and finite. The only
/// constructors check it, and deserialization goes through the same check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCalibration")]
pub struct Calibration {
    pixels_per_meter: f64,
    reference: Reference,
}

#[derive(Deserialize)]
struct RawCalibration {
    pixels_per_meter: f64,
    reference: Reference,
}

impl TryFrom<RawCalibration> for Calibration {
    type Error = Error;
    fn try_from(raw: RawCalibration) -> Result<Self> {
        Calibration::with_reference(raw.pixels_per_meter, raw.reference)
    }
}

impl Calibration {
    pub(crate) fn with_reference(pixels_per_meter: f64, reference: Reference) -> Result<Self> {
        if !(pixels_per_meter.is_finite() && pixels_per_meter > 0.0) {
            return Err(CalibrationFault::Scale(pixels_per_meter).into());
        }
        Ok(Self {
            pixels_per_meter,
            reference,
        })
    }

    /// Known scale, e.g. restored from an earlier session.
    pub fn from_pixels_per_meter(pixels_per_meter: f64) -> Result<Self> {
        Self::with_reference(pixels_per_meter, Reference::Manual)
    }

    #[inline]
    pub fn pixels_per_meter(&self) -> f64 {
        self.pixels_per_meter
    }

    #[inline]
    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    /// Pixel length → meters.
    #[inline]
    pub fn to_meters(&self, px: f64) -> f64 {
        px / self.pixels_per_meter
    }

    /// Pixel area → square meters.
    #[inline]
    pub fn to_square_meters(&self, px2: f64) -> f64 {
        px2 / (self.pixels_per_meter * self.pixels_per_meter)
    }

    /// Meters → pixel length.
    #[inline]
    pub fn to_pixels(&self, meters: f64) -> f64 {
        meters * self.pixels_per_meter
    }
}

/// The calibration currently in force for a document, with its identity.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveCalibration {
    pub id: CalibrationId,
    pub calibration: Calibration,
}
