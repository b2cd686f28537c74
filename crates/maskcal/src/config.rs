//! Engine configuration.
//!
//! - One flat struct with a `Default` impl; every field has a sensible value so
//!   partial JSON configs deserialize (`#[serde(default)]`).
//! - Pixel-valued fields are in image pixels, not screen pixels.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom::{cfg::DEFAULT_MITER_LIMIT, Side};

/// Smallest sample spacing ever used, whatever the brush size says.
pub const MIN_SPACING_FLOOR: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineCfg {
    /// Brush size in pixels; also the area tool's closing distance.
    pub brush_size_px: f64,
    /// Sample spacing as a fraction of the brush size.
    pub spacing_factor: f64,
    /// Band height assigned to freshly committed waterline masks.
    pub default_band_height_m: f64,
    /// Which side of the waterline the band grows towards.
    pub band_side: Side,
    /// Eraser reach around polylines, in pixels.
    pub eraser_tolerance_px: f64,
    /// Maximum number of undo records kept.
    pub history_depth: usize,
    /// Miter clamp for band offsets (multiples of the offset distance).
    pub miter_limit: f64,
}

impl Default for EngineCfg {
    fn default() -> Self {
        Self {
            brush_size_px: 12.0,
            spacing_factor: 0.25,
            default_band_height_m: 0.15,
            band_side: Side::Outside,
            eraser_tolerance_px: 8.0,
            history_depth: 100,
            miter_limit: DEFAULT_MITER_LIMIT,
        }
    }
}

impl EngineCfg {
    /// Reject settings that would silently disable a tool.
    ///
    /// Band height must be positive; brush size, spacing factor and eraser
    /// tolerance non-negative; miter limit at least 1. All must be finite.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("default_band_height_m", self.default_band_height_m, self.default_band_height_m > 0.0),
            ("brush_size_px", self.brush_size_px, self.brush_size_px >= 0.0),
            ("spacing_factor", self.spacing_factor, self.spacing_factor >= 0.0),
            ("eraser_tolerance_px", self.eraser_tolerance_px, self.eraser_tolerance_px >= 0.0),
            ("miter_limit", self.miter_limit, self.miter_limit >= 1.0),
        ];
        for (field, value, ok) in checks {
            if !(ok && value.is_finite()) {
                return Err(Error::InvalidConfig { field, value });
            }
        }
        Ok(())
    }

    /// Minimum distance between accepted pointer samples. Never zero.
    pub fn min_spacing(&self) -> f64 {
        let derived = self.brush_size_px * self.spacing_factor;
        if derived.is_finite() {
            derived.max(MIN_SPACING_FLOOR)
        } else {
            MIN_SPACING_FLOOR
        }
    }

    /// First/last distance under which an area stroke closes into a polygon.
    pub fn closing_distance(&self) -> f64 {
        if self.brush_size_px.is_finite() {
            self.brush_size_px.max(0.0)
        } else {
            0.0
        }
    }

    /// Eraser reach, never below the brush radius.
    pub fn eraser_reach(&self) -> f64 {
        self.eraser_tolerance_px.max(self.brush_size_px * 0.5).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_never_zero() {
        let cfg = EngineCfg {
            brush_size_px: 0.0,
            ..EngineCfg::default()
        };
        assert_eq!(cfg.min_spacing(), MIN_SPACING_FLOOR);
        let cfg = EngineCfg {
            spacing_factor: f64::NAN,
            ..EngineCfg::default()
        };
        assert_eq!(cfg.min_spacing(), MIN_SPACING_FLOOR);
        assert!((EngineCfg::default().min_spacing() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_unusable_settings() {
        assert_eq!(EngineCfg::default().validate(), Ok(()));
        let cfg: EngineCfg = serde_json::from_str(r#"{"default_band_height_m": 0}"#).unwrap();
        assert_eq!(
            cfg.validate(),
            Err(Error::InvalidConfig {
                field: "default_band_height_m",
                value: 0.0
            })
        );
        let cfg = EngineCfg {
            brush_size_px: -1.0,
            ..EngineCfg::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidConfig { field: "brush_size_px", .. })
        ));
        let cfg = EngineCfg {
            default_band_height_m: f64::INFINITY,
            ..EngineCfg::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = EngineCfg {
            brush_size_px: 0.0,
            ..EngineCfg::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EngineCfg = serde_json::from_str(r#"{"brush_size_px": 20.0}"#).unwrap();
        assert_eq!(cfg.brush_size_px, 20.0);
        assert_eq!(cfg.history_depth, 100);
        assert_eq!(cfg.band_side, Side::Outside);
    }
}
