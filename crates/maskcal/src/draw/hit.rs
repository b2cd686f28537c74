//! Eraser hit-testing against committed masks.

use crate::calib::Calibration;
use crate::config::EngineCfg;
use crate::geom::{band_polygon, distance_to_polyline, point_in_polygon, Point};
use crate::store::{Mask, MaskId, Shape};

fn hits(mask: &Mask, p: Point, reach: f64, cfg: &EngineCfg, cal: Option<&Calibration>) -> bool {
    if let Some(b) = mask.bounds() {
        let pad = match (mask.shape(), cal) {
            (Shape::WaterlineBand { band_height_m, .. }, Some(cal)) => {
                reach.max(cal.to_pixels(*band_height_m) * cfg.miter_limit.max(1.0))
            }
            _ => reach,
        };
        if !b.padded(pad).contains(p) {
            return false;
        }
    }
    match mask.shape() {
        Shape::Area { polygon } => {
            polygon.contains(p)
                || distance_to_polyline(p, polygon.points()).is_some_and(|d| d <= reach)
        }
        Shape::Linear { polyline } => {
            distance_to_polyline(p, polyline.points()).is_some_and(|d| d <= reach)
        }
        Shape::WaterlineBand {
            polyline,
            band_height_m,
        } => {
            if distance_to_polyline(p, polyline.points()).is_some_and(|d| d <= reach) {
                return true;
            }
            let Some(cal) = cal else {
                return false;
            };
            let ring = band_polygon(
                polyline.points(),
                cal.to_pixels(*band_height_m),
                cfg.band_side,
                cfg.miter_limit,
            );
            point_in_polygon(p, &ring)
        }
    }
}

/// Topmost mask under `p`, or `None`.
///
/// Later masks draw on top, so the list is scanned back to front. Areas hit
/// inside or near their outline; lines hit within the eraser reach; bands
/// also hit anywhere inside the band once a calibration exists.
pub fn hit_test(
    masks: &[Mask],
    p: Point,
    cfg: &EngineCfg,
    calibration: Option<&Calibration>,
) -> Option<MaskId> {
    let reach = cfg.eraser_reach();
    masks
        .iter()
        .rev()
        .find(|m| hits(m, p, reach, cfg, calibration))
        .map(Mask::id)
}
