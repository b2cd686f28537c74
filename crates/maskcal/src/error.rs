//! Error kinds shared by every module.
//!
//! All failures are local and synchronous; nothing here is retryable.
//! `InvalidGeometry` and `TypeMismatch` point at a caller bug, while
//! `InvalidCalibration` and `NotFound` are meant to be shown to the user.
//! `InvalidConfig` is raised once, when a configuration is loaded.

use std::fmt;

use crate::store::{MaskId, MaskKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Malformed point sets or shape parameters.
    InvalidGeometry(GeometryFault),
    /// Rejected calibration input.
    InvalidCalibration(CalibrationFault),
    /// No mask with this id in the store.
    NotFound(MaskId),
    /// Geometry replacement across mask variants.
    TypeMismatch {
        id: MaskId,
        expected: MaskKind,
        found: MaskKind,
    },
    /// An engine setting outside its usable range.
    InvalidConfig { field: &'static str, value: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum GeometryFault {
    TooFewPoints { need: usize, got: usize },
    NonFinite { index: usize },
    BandHeight(f64),
    DuplicateId(MaskId),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CalibrationFault {
    /// Reference length must be strictly positive and finite.
    Length(f64),
    /// Reference points closer than the coincidence tolerance.
    CoincidentPoints,
    /// Pixels-per-meter must be strictly positive and finite.
    Scale(f64),
    /// Input coordinates were NaN or infinite.
    NonFinite,
    /// Ground corners do not span a usable quadrilateral.
    DegenerateQuad,
    /// Fewer than four ground corners collected so far.
    NotReady { collected: usize },
}

impl fmt::Display for GeometryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryFault::TooFewPoints { need, got } => {
                write!(f, "need at least {need} points, got {got}")
            }
            GeometryFault::NonFinite { index } => {
                write!(f, "point {index} has a non-finite coordinate")
            }
            GeometryFault::BandHeight(h) => {
                write!(f, "band height must be positive and finite (got {h})")
            }
            GeometryFault::DuplicateId(id) => write!(f, "mask id {id} appears more than once"),
        }
    }
}

impl fmt::Display for CalibrationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationFault::Length(len) => {
                write!(f, "reference length must be positive (got {len} m)")
            }
            CalibrationFault::CoincidentPoints => write!(f, "reference points coincide"),
            CalibrationFault::Scale(ppm) => {
                write!(f, "pixels per meter must be positive and finite (got {ppm})")
            }
            CalibrationFault::NonFinite => write!(f, "calibration point is not finite"),
            CalibrationFault::DegenerateQuad => {
                write!(f, "ground corners do not form a quadrilateral")
            }
            CalibrationFault::NotReady { collected } => {
                write!(f, "ground plane not ready ({collected} of 4 corners)")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidGeometry(fault) => write!(f, "invalid geometry: {fault}"),
            Error::InvalidCalibration(fault) => write!(f, "invalid calibration: {fault}"),
            Error::NotFound(id) => write!(f, "mask {id} not found"),
            Error::TypeMismatch {
                id,
                expected,
                found,
            } => write!(
                f,
                "mask {id} is {expected:?}; cannot take {found:?} geometry"
            ),
            Error::InvalidConfig { field, value } => {
                write!(f, "config field `{field}` out of range (got {value})")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<GeometryFault> for Error {
    fn from(fault: GeometryFault) -> Self {
        Error::InvalidGeometry(fault)
    }
}

impl From<CalibrationFault> for Error {
    fn from(fault: CalibrationFault) -> Self {
        Error::InvalidCalibration(fault)
    }
}
