//! Per-material sums for the costing collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calib::ActiveCalibration;
use crate::store::{MaskKind, MaskStore};

use super::project::MetricsProjector;

/// Quantities of one material across all masks that reference it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialTotals {
    /// `None` groups masks without a material.
    pub material_id: Option<String>,
    pub masks: usize,
    pub area_m2: f64,
    /// Linear and waterline centerlines; area outlines are not counted.
    pub length_m: f64,
    pub band_area_m2: f64,
}

impl MetricsProjector {
    /// Totals grouped by material id (unassigned first, then by id).
    ///
    /// `None` when uncalibrated: there is nothing meaningful to sum.
    pub fn totals_by_material(
        &mut self,
        store: &MaskStore,
        active: Option<&ActiveCalibration>,
    ) -> Option<Vec<MaterialTotals>> {
        let active = active?;
        let mut groups: BTreeMap<Option<String>, MaterialTotals> = BTreeMap::new();
        for mask in store.list() {
            let m = self.compute_mask(mask, active);
            let key = mask.material_id().map(str::to_owned);
            let entry = groups.entry(key.clone()).or_insert_with(|| MaterialTotals {
                material_id: key,
                ..MaterialTotals::default()
            });
            entry.masks += 1;
            entry.area_m2 += m.area_m2.unwrap_or(0.0);
            if mask.kind() != MaskKind::Area {
                entry.length_m += m.perimeter_m.unwrap_or(0.0);
            }
            entry.band_area_m2 += m.band_area_m2.unwrap_or(0.0);
        }
        Some(groups.into_values().collect())
    }
}
