//! Tools, pointer events and the transient drawing session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geom::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Pan/zoom; the host handles it, the core ignores its events.
    #[default]
    Hand,
    Area,
    Linear,
    Waterline,
    Eraser,
}

impl Tool {
    /// Whether this tool opens a drawing session.
    pub fn draws(self) -> bool {
        matches!(self, Tool::Area | Tool::Linear | Tool::Waterline)
    }

    /// Points needed before a commit produces anything.
    pub fn min_points(self) -> usize {
        match self {
            Tool::Area => 3,
            Tool::Linear | Tool::Waterline => 2,
            Tool::Hand | Tool::Eraser => usize::MAX,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Down,
    Move,
    Up,
}

/// A pointer sample in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub phase: Phase,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self { x, y, phase: Phase::Down }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self { x, y, phase: Phase::Move }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self { x, y, phase: Phase::Up }
    }

    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The in-progress gesture. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingSession {
    tool: Tool,
    points: Vec<Point>,
    started_at: DateTime<Utc>,
}

impl DrawingSession {
    pub(crate) fn start(tool: Tool, first: Point) -> Self {
        Self {
            tool,
            points: vec![first],
            started_at: Utc::now(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Append `p` if it lies farther than `min_spacing` from the last sample.
    pub(crate) fn sample(&mut self, p: Point, min_spacing: f64) -> bool {
        match self.points.last() {
            Some(last) if (p - last).norm() <= min_spacing => false,
            _ => {
                self.points.push(p);
                true
            }
        }
    }

    pub(crate) fn into_points(self) -> Vec<Point> {
        self.points
    }
}
