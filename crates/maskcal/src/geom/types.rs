//! Validated, immutable point sequences.
//!
//! `Polygon` and `Polyline` own their points through an `Arc<[Point]>`:
//! cloning shares storage and there is no way to mutate points in place.
//! A new shape is a new value.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, GeometryFault, Result};

use super::kernel::{open_length, point_in_polygon, require, shoelace};
use super::Point;

fn validate(points: &[Point], need: usize) -> Result<()> {
    require(points, need)?;
    if let Some(index) = points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(GeometryFault::NonFinite { index }.into());
    }
    Ok(())
}

/// Closed polygon, at least three finite vertices. Holes are not modelled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    points: Arc<[Point]>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        validate(&points, 3)?;
        Ok(Self {
            points: points.into(),
        })
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Unsigned area in the points' unit squared.
    pub fn area(&self) -> f64 {
        (0.5 * shoelace(&self.points)).abs()
    }

    /// Closed-ring perimeter.
    pub fn perimeter(&self) -> f64 {
        let closing = (self.points[0] - self.points[self.points.len() - 1]).norm();
        open_length(&self.points) + closing
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        point_in_polygon(p, &self.points)
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = Error;
    fn try_from(points: Vec<Point>) -> Result<Self> {
        Polygon::new(points)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(p: Polygon) -> Self {
        p.points.to_vec()
    }
}

/// Open polyline, at least two finite points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polyline {
    points: Arc<[Point]>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        validate(&points, 2)?;
        Ok(Self {
            points: points.into(),
        })
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn length(&self) -> f64 {
        open_length(&self.points)
    }
}

impl TryFrom<Vec<Point>> for Polyline {
    type Error = Error;
    fn try_from(points: Vec<Point>) -> Result<Self> {
        Polyline::new(points)
    }
}

impl From<Polyline> for Vec<Point> {
    fn from(p: Polyline) -> Self {
        p.points.to_vec()
    }
}

/// Offset side relative to the travel direction of a polyline.
///
/// `Outside` is the left-hand normal in image coordinates: for a stroke drawn
/// left to right it points up the screen. `Inside` is the opposite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Outside,
    Inside,
}

impl Side {
    #[inline]
    pub(crate) fn sign(self) -> f64 {
        match self {
            Side::Outside => 1.0,
            Side::Inside => -1.0,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Grow by `pad` on every side.
    pub fn padded(&self, pad: f64) -> Self {
        let d = Point::new(pad, pad);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
