use super::*;
use crate::calib::{solve_two_point, ActiveCalibration, Calibration, CalibrationId};
use crate::config::EngineCfg;
use crate::error::Error;
use crate::geom::{Point, Polygon, Polyline};
use crate::store::{MaskDraft, MaskId, MaskStore, Shape};
use nalgebra::vector;

fn active(ppm: f64, id: u64) -> ActiveCalibration {
    ActiveCalibration {
        id: CalibrationId(id),
        calibration: Calibration::from_pixels_per_meter(ppm).unwrap(),
    }
}

fn polyline(points: &[(f64, f64)]) -> Polyline {
    Polyline::new(points.iter().map(|&(x, y)| vector![x, y]).collect::<Vec<Point>>()).unwrap()
}

fn square_px(side: f64) -> Shape {
    Shape::Area {
        polygon: Polygon::new(vec![
            vector![0.0, 0.0],
            vector![side, 0.0],
            vector![side, side],
            vector![0.0, side],
        ])
        .unwrap(),
    }
}

fn fixture() -> (MaskStore, MaskId, MaskId, MaskId) {
    let mut s = MaskStore::with_seed(20, 11);
    let area = s
        .insert(MaskDraft::new(square_px(200.0)).with_material("pavers"))
        .unwrap();
    let line = s
        .insert(MaskDraft::new(Shape::Linear {
            polyline: polyline(&[(0.0, 0.0), (100.0, 0.0)]),
        }))
        .unwrap();
    let band = s
        .insert(
            MaskDraft::new(
                Shape::waterline(polyline(&[(0.0, 0.0), (300.0, 0.0)]), 0.15).unwrap(),
            )
            .with_material("waterline-tile"),
        )
        .unwrap();
    (s, area, line, band)
}

#[test]
fn uncalibrated_metrics_are_all_none() {
    let (s, area, line, band) = fixture();
    let mut p = MetricsProjector::default();
    for id in [area, line, band] {
        let m = p.compute(&s, None, id).unwrap();
        assert!(m.is_empty());
        assert_eq!(m, MaskMetrics::default());
    }
    assert!(p.totals_by_material(&s, None).is_none());
}

#[test]
fn calibrated_line_100px_at_100ppm_is_one_meter() {
    let (s, _, line, _) = fixture();
    let cal = solve_two_point(vector![0.0, 0.0], vector![200.0, 0.0], 2.0).unwrap();
    let active = ActiveCalibration {
        id: CalibrationId(1),
        calibration: cal,
    };
    let mut p = MetricsProjector::default();
    let m = p.compute(&s, Some(&active), line).unwrap();
    assert!((m.perimeter_m.unwrap() - 1.0).abs() < 1e-12);
    assert!(m.area_m2.is_none());
    assert!(m.band_area_m2.is_none());
}

#[test]
fn area_scales_by_ppm_squared() {
    let (s, area, _, _) = fixture();
    let mut p = MetricsProjector::default();
    let m = p.compute(&s, Some(&active(100.0, 1)), area).unwrap();
    assert!((m.area_m2.unwrap() - 4.0).abs() < 1e-12);
    assert!((m.perimeter_m.unwrap() - 8.0).abs() < 1e-12);
}

#[test]
fn straight_band_area_is_length_times_height() {
    let (s, _, _, band) = fixture();
    let mut p = MetricsProjector::default();
    let m = p.compute(&s, Some(&active(100.0, 1)), band).unwrap();
    assert!((m.perimeter_m.unwrap() - 3.0).abs() < 1e-12);
    assert!((m.band_area_m2.unwrap() - 0.45).abs() < 1e-9);
}

#[test]
fn band_area_strictly_increases_with_height() {
    let mut s = MaskStore::with_seed(20, 5);
    // gentle bend, band on the convex side
    let shape = Shape::waterline(
        polyline(&[(0.0, 0.0), (120.0, 0.0), (200.0, 60.0), (260.0, 160.0)]),
        0.05,
    )
    .unwrap();
    let id = s.insert(MaskDraft::new(shape)).unwrap();
    let cal = active(80.0, 1);
    let mut p = MetricsProjector::default();
    let mut last = 0.0;
    for h in [0.05, 0.1, 0.2, 0.35, 0.5] {
        s.set_band_height(id, h).unwrap();
        let band = p.compute(&s, Some(&cal), id).unwrap().band_area_m2.unwrap();
        assert!(band > last, "band area {band} not above {last} at h={h}");
        last = band;
    }
}

#[test]
fn band_area_grows_on_the_inner_side_of_a_corner() {
    let mut s = MaskStore::with_seed(20, 6);
    // default side lies inside this right turn; past h = 1 m the band is taller than a leg
    let shape = Shape::waterline(polyline(&[(0.0, 0.0), (100.0, 0.0), (100.0, -100.0)]), 0.1)
        .unwrap();
    let id = s.insert(MaskDraft::new(shape)).unwrap();
    let cal = active(100.0, 1);
    let mut p = MetricsProjector::default();
    let first = p.compute(&s, Some(&cal), id).unwrap().band_area_m2.unwrap();
    // two 1 m x 0.1 m strips sharing a 0.1 m x 0.1 m corner
    assert!((first - 0.19).abs() < 1e-12);
    let mut last = first;
    for h in [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 3.0] {
        s.set_band_height(id, h).unwrap();
        let band = p.compute(&s, Some(&cal), id).unwrap().band_area_m2.unwrap();
        assert!(band > last, "band area {band} not above {last} at h={h}");
        last = band;
    }
}

#[test]
fn memo_invalidates_on_geometry_and_calibration_change() {
    let (mut s, area, _, _) = fixture();
    let mut p = MetricsProjector::default();
    let cal_a = active(100.0, 1);
    let first = p.compute(&s, Some(&cal_a), area).unwrap();
    assert_eq!(p.cached(), 1);
    assert_eq!(p.compute(&s, Some(&cal_a), area).unwrap(), first);

    s.replace_geometry(area, square_px(100.0)).unwrap();
    let reshaped = p.compute(&s, Some(&cal_a), area).unwrap();
    assert!((reshaped.area_m2.unwrap() - 1.0).abs() < 1e-12);

    // replaced calibration: new identity and scale
    let cal_b = active(50.0, 2);
    let rescaled = p.compute(&s, Some(&cal_b), area).unwrap();
    assert!((rescaled.area_m2.unwrap() - 4.0).abs() < 1e-12);
}

#[test]
fn missing_mask_is_not_found() {
    let (s, _, _, _) = fixture();
    let mut p = MetricsProjector::default();
    assert_eq!(
        p.compute(&s, None, MaskId(5)).unwrap_err(),
        Error::NotFound(MaskId(5))
    );
}

#[test]
fn prune_drops_removed_masks() {
    let (mut s, area, line, band) = fixture();
    let mut p = MetricsProjector::default();
    let cal = active(100.0, 1);
    for id in [area, line, band] {
        p.compute(&s, Some(&cal), id).unwrap();
    }
    s.remove(line).unwrap();
    p.prune(&s);
    assert_eq!(p.cached(), 2);
}

#[test]
fn totals_group_by_material() {
    let (s, _, _, _) = fixture();
    let mut p = MetricsProjector::default();
    let totals = p.totals_by_material(&s, Some(&active(100.0, 1))).unwrap();
    assert_eq!(totals.len(), 3);
    assert_eq!(totals[0].material_id, None);
    assert!((totals[0].length_m - 1.0).abs() < 1e-12);
    assert_eq!(totals[1].material_id.as_deref(), Some("pavers"));
    assert!((totals[1].area_m2 - 4.0).abs() < 1e-12);
    assert_eq!(totals[1].length_m, 0.0);
    assert_eq!(totals[2].material_id.as_deref(), Some("waterline-tile"));
    assert!((totals[2].band_area_m2 - 0.45).abs() < 1e-9);
    assert!((totals[2].length_m - 3.0).abs() < 1e-12);
}

#[test]
fn config_side_is_respected() {
    let (s, _, _, band) = fixture();
    let cfg = EngineCfg {
        band_side: crate::geom::Side::Inside,
        ..EngineCfg::default()
    };
    let mut p = MetricsProjector::new(&cfg);
    let m = p.compute(&s, Some(&active(100.0, 1)), band).unwrap();
    // straight line: either side gives the same area
    assert!((m.band_area_m2.unwrap() - 0.45).abs() < 1e-9);
}
