//! Per-mask projection and its memo.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calib::{ActiveCalibration, Calibration, CalibrationId};
use crate::config::EngineCfg;
use crate::error::{Error, Result};
use crate::geom::{band_area, Side};
use crate::store::{Mask, MaskId, MaskStore, Shape};

/// Physical quantities for one mask. `None` means "not applicable" or
/// "uncalibrated".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_m2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perimeter_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_area_m2: Option<f64>,
}

impl MaskMetrics {
    pub fn is_empty(&self) -> bool {
        self.area_m2.is_none() && self.perimeter_m.is_none() && self.band_area_m2.is_none()
    }
}

/// Pure projection of one mask under one calibration.
pub fn project(mask: &Mask, cal: &Calibration, side: Side, miter_limit: f64) -> MaskMetrics {
    match mask.shape() {
        Shape::Area { polygon } => MaskMetrics {
            area_m2: Some(cal.to_square_meters(polygon.area())),
            perimeter_m: Some(cal.to_meters(polygon.perimeter())),
            band_area_m2: None,
        },
        Shape::Linear { polyline } => MaskMetrics {
            perimeter_m: Some(cal.to_meters(polyline.length())),
            ..MaskMetrics::default()
        },
        Shape::WaterlineBand {
            polyline,
            band_height_m,
        } => {
            let band_px = band_area(
                polyline.points(),
                cal.to_pixels(*band_height_m),
                side,
                miter_limit,
            );
            MaskMetrics {
                area_m2: None,
                perimeter_m: Some(cal.to_meters(polyline.length())),
                band_area_m2: Some(cal.to_square_meters(band_px)),
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Memo {
    revision: u64,
    calibration: CalibrationId,
    metrics: MaskMetrics,
}

/// Memoizing front end for `project`.
#[derive(Clone, Debug)]
pub struct MetricsProjector {
    side: Side,
    miter_limit: f64,
    memo: HashMap<MaskId, Memo>,
}

impl Default for MetricsProjector {
    fn default() -> Self {
        Self::new(&EngineCfg::default())
    }
}

impl MetricsProjector {
    pub fn new(cfg: &EngineCfg) -> Self {
        Self {
            side: cfg.band_side,
            miter_limit: cfg.miter_limit,
            memo: HashMap::new(),
        }
    }

    /// Metrics for `id` under the active calibration (if any).
    pub fn compute(
        &mut self,
        store: &MaskStore,
        active: Option<&ActiveCalibration>,
        id: MaskId,
    ) -> Result<MaskMetrics> {
        let mask = store.get(id).ok_or(Error::NotFound(id))?;
        let Some(active) = active else {
            return Ok(MaskMetrics::default());
        };
        Ok(self.compute_mask(mask, active))
    }

    pub(crate) fn compute_mask(&mut self, mask: &Mask, active: &ActiveCalibration) -> MaskMetrics {
        if let Some(m) = self.memo.get(&mask.id()) {
            if m.revision == mask.revision() && m.calibration == active.id {
                return m.metrics;
            }
        }
        trace!(id = %mask.id(), revision = mask.revision(), "projecting metrics");
        let metrics = project(mask, &active.calibration, self.side, self.miter_limit);
        self.memo.insert(
            mask.id(),
            Memo {
                revision: mask.revision(),
                calibration: active.id,
                metrics,
            },
        );
        metrics
    }

    /// Forget entries for masks no longer in `store`.
    pub fn prune(&mut self, store: &MaskStore) {
        self.memo.retain(|id, _| store.contains(*id));
    }

    pub fn clear(&mut self) {
        self.memo.clear();
    }

    /// Number of memoized entries.
    pub fn cached(&self) -> usize {
        self.memo.len()
    }
}
