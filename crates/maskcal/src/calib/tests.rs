use super::*;
use crate::error::{CalibrationFault, Error};
use crate::geom::Point;
use nalgebra::vector;

fn rect_clicks() -> [Point; 4] {
    // clockwise on screen (y down)
    [
        vector![100.0, 100.0],
        vector![300.0, 100.0],
        vector![300.0, 200.0],
        vector![100.0, 200.0],
    ]
}

#[test]
fn two_point_200px_over_2m_is_100ppm() {
    let cal = solve_two_point(vector![0.0, 0.0], vector![200.0, 0.0], 2.0).unwrap();
    assert!((cal.pixels_per_meter() - 100.0).abs() < 1e-12);
    assert!((cal.to_meters(100.0) - 1.0).abs() < 1e-12);
    assert!((cal.to_square_meters(10_000.0) - 1.0).abs() < 1e-12);
    assert!((cal.to_pixels(0.5) - 50.0).abs() < 1e-12);
    assert!(matches!(cal.reference(), Reference::TwoPoint { length_m, .. } if *length_m == 2.0));
}

#[test]
fn two_point_rejects_bad_input() {
    let p = vector![10.0, 10.0];
    let q = vector![20.0, 10.0];
    assert_eq!(
        solve_two_point(p, q, 0.0),
        Err(Error::InvalidCalibration(CalibrationFault::Length(0.0)))
    );
    assert!(solve_two_point(p, q, -1.0).is_err());
    assert!(solve_two_point(p, q, f64::NAN).is_err());
    assert_eq!(
        solve_two_point(p, p, 1.0),
        Err(Error::InvalidCalibration(CalibrationFault::CoincidentPoints))
    );
    assert_eq!(
        solve_two_point(vector![f64::INFINITY, 0.0], q, 1.0),
        Err(Error::InvalidCalibration(CalibrationFault::NonFinite))
    );
}

#[test]
fn manual_scale_must_be_positive() {
    assert!(Calibration::from_pixels_per_meter(50.0).is_ok());
    assert!(Calibration::from_pixels_per_meter(0.0).is_err());
    assert!(Calibration::from_pixels_per_meter(f64::INFINITY).is_err());
}

#[test]
fn deserialize_rejects_non_positive_scale() {
    let bad = r#"{"pixels_per_meter": -3.0, "reference": {"mode": "manual"}}"#;
    assert!(serde_json::from_str::<Calibration>(bad).is_err());
    let good = r#"{"pixels_per_meter": 3.0, "reference": {"mode": "manual"}}"#;
    let cal: Calibration = serde_json::from_str(good).unwrap();
    assert_eq!(cal.pixels_per_meter(), 3.0);
}

#[test]
fn plane_pose_rectangle() {
    let pose = PlanePose::from_corners(rect_clicks()).unwrap();
    assert!((pose.width_px - 200.0).abs() < 1e-12);
    assert!((pose.height_px - 100.0).abs() < 1e-12);
    assert!((pose.center - vector![200.0, 150.0]).norm() < 1e-12);
    assert!((pose.axis_u - vector![1.0, 0.0]).norm() < 1e-12);
    assert!((pose.axis_v - vector![0.0, 1.0]).norm() < 1e-12);
    assert!(pose.rotation().abs() < 1e-12);
    assert!((pose.aspect() - 2.0).abs() < 1e-12);
}

#[test]
fn plane_pose_trapezoid_averages_edges() {
    // perspective-ish trapezoid: far edge shorter
    let corners = [
        vector![150.0, 100.0],
        vector![250.0, 100.0],
        vector![300.0, 200.0],
        vector![100.0, 200.0],
    ];
    let pose = PlanePose::from_corners(corners).unwrap();
    assert!((pose.width_px - 150.0).abs() < 1e-12);
    let side = (50.0f64 * 50.0 + 100.0 * 100.0).sqrt();
    assert!((pose.height_px - side).abs() < 1e-12);
    // homography hits every corner and round-trips
    let uv = [
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ];
    for (c, q) in corners.iter().zip(uv.iter()) {
        let img = pose.plane_to_image(*q).unwrap();
        assert!((img - c).norm() < 1e-6);
        let back = pose.image_to_plane(*c).unwrap();
        assert!((back - q).norm() < 1e-9);
    }
}

#[test]
fn plane_pose_derives_scalar_calibration() {
    let pose = PlanePose::from_corners(rect_clicks()).unwrap();
    let cal = pose.calibration(4.0).unwrap();
    assert!((cal.pixels_per_meter() - 50.0).abs() < 1e-12);
    assert!(matches!(cal.reference(), Reference::GroundPlane { .. }));
    assert!(pose.calibration(0.0).is_err());
}

#[test]
fn collinear_corners_rejected() {
    let corners = [
        vector![0.0, 0.0],
        vector![10.0, 0.0],
        vector![20.0, 0.0],
        vector![0.0, 10.0],
    ];
    assert_eq!(
        PlanePose::from_corners(corners),
        Err(Error::InvalidCalibration(CalibrationFault::DegenerateQuad))
    );
}

#[test]
fn collector_pending_until_four_then_fifth_restarts() {
    let mut col = GroundCollector::new();
    let clicks = rect_clicks();
    for (i, c) in clicks.iter().take(3).enumerate() {
        assert_eq!(
            col.click(*c).unwrap(),
            GroundStep::Pending { collected: i + 1 }
        );
    }
    assert!(matches!(col.click(clicks[3]).unwrap(), GroundStep::Ready(_)));
    // fifth click silently starts a new set
    assert_eq!(
        col.click(vector![5.0, 5.0]).unwrap(),
        GroundStep::Pending { collected: 1 }
    );
    assert_eq!(col.collected(), &[vector![5.0, 5.0]]);
}

#[test]
fn collector_resets_after_degenerate_quad() {
    let mut col = GroundCollector::new();
    for p in [
        vector![0.0, 0.0],
        vector![10.0, 0.0],
        vector![20.0, 0.0],
    ] {
        col.click(p).unwrap();
    }
    assert!(col.click(vector![30.0, 0.0]).is_err());
    assert!(col.collected().is_empty());
    assert!(col.click(vector![f64::NAN, 0.0]).is_err());
    assert!(col.collected().is_empty());
}
