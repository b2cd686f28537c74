//! Per-mask metrics and per-material totals for a loaded document.

use anyhow::Result;
use maskcal::metrics::{MaskMetrics, MaterialTotals};
use maskcal::store::{MaskId, MaskKind};
use maskcal::Document;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MaskRow {
    pub id: MaskId,
    pub kind: MaskKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,
    #[serde(flatten)]
    pub metrics: MaskMetrics,
}

#[derive(Debug, Serialize)]
pub struct Measurement {
    pub pixels_per_meter: Option<f64>,
    pub masks: Vec<MaskRow>,
    /// Absent while uncalibrated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Vec<MaterialTotals>>,
}

pub fn measure(doc: &mut Document) -> Result<Measurement> {
    let ids: Vec<MaskId> = doc.store().list().iter().map(|m| m.id()).collect();
    let mut masks = Vec::with_capacity(ids.len());
    for id in ids {
        let metrics = doc.metrics(id)?;
        let Some(mask) = doc.store().get(id) else { continue };
        masks.push(MaskRow {
            id,
            kind: mask.kind(),
            material_id: mask.material_id().map(str::to_owned),
            metrics,
        });
    }
    Ok(Measurement {
        pixels_per_meter: doc.calibration().map(|c| c.pixels_per_meter()),
        masks,
        totals: doc.totals(),
    })
}
