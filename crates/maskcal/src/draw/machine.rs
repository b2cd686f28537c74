//! Per-tool pointer state machine.
//!
//! States: `Idle` → `Collecting` → (commit | cancel) → `Idle`.
//! Commit and cancel are transitions, not resting states.

use tracing::{debug, trace, warn};

use crate::config::EngineCfg;
use crate::geom::{distance, Point, Polygon, Polyline};
use crate::store::{MaskDraft, Shape};

use super::types::{DrawingSession, Phase, PointerEvent, Tool};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DrawState {
    #[default]
    Idle,
    Collecting(DrawingSession),
}

/// What one pointer event did.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOutcome {
    /// Nothing to do (hover, hand tool, stray up).
    Ignored,
    /// A session opened with its first point.
    Started,
    /// A move sample; `accepted` is false when it was too close to the last one.
    Sampled { accepted: bool },
    /// The gesture produced a mask draft.
    Committed(MaskDraft),
    /// The gesture ended with too few points and left no trace.
    Discarded { points: usize },
    /// Eraser press: the caller should hit-test this point.
    EraseAt(Point),
}

#[derive(Clone, Debug)]
pub struct DrawMachine {
    tool: Tool,
    state: DrawState,
    cfg: EngineCfg,
}

impl DrawMachine {
    pub fn new(cfg: EngineCfg) -> Self {
        Self {
            tool: Tool::default(),
            state: DrawState::Idle,
            cfg,
        }
    }

    #[inline]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[inline]
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn session(&self) -> Option<&DrawingSession> {
        match &self.state {
            DrawState::Collecting(s) => Some(s),
            DrawState::Idle => None,
        }
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, DrawState::Collecting(_))
    }

    pub fn cfg(&self) -> &EngineCfg {
        &self.cfg
    }

    /// Switch tools. An open session is abandoned, as if cancelled.
    pub fn set_tool(&mut self, tool: Tool) -> bool {
        let cancelled = tool != self.tool && self.cancel();
        self.tool = tool;
        cancelled
    }

    /// Drop the open session, if any. No mask, no history.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            DrawState::Collecting(s) => {
                debug!(tool = ?s.tool(), points = s.points().len(), "drawing cancelled");
                true
            }
            DrawState::Idle => false,
        }
    }

    pub fn handle(&mut self, ev: PointerEvent) -> DrawOutcome {
        if !ev.is_finite() {
            warn!(x = ev.x, y = ev.y, "ignoring non-finite pointer sample");
            return DrawOutcome::Ignored;
        }
        let p = ev.point();
        match self.tool {
            Tool::Hand => DrawOutcome::Ignored,
            Tool::Eraser => match ev.phase {
                Phase::Down => DrawOutcome::EraseAt(p),
                _ => DrawOutcome::Ignored,
            },
            tool => self.handle_draw(tool, ev.phase, p),
        }
    }

    fn handle_draw(&mut self, tool: Tool, phase: Phase, p: Point) -> DrawOutcome {
        let spacing = self.cfg.min_spacing();
        match (phase, &mut self.state) {
            (Phase::Down, state) => {
                if let DrawState::Collecting(stale) = state {
                    // a down without the matching up: the old gesture is lost
                    warn!(points = stale.points().len(), "restarting unfinished stroke");
                }
                *state = DrawState::Collecting(DrawingSession::start(tool, p));
                trace!(x = p.x, y = p.y, "stroke start");
                DrawOutcome::Started
            }
            (Phase::Move, DrawState::Collecting(session)) => DrawOutcome::Sampled {
                accepted: session.sample(p, spacing),
            },
            (Phase::Up, DrawState::Collecting(session)) => {
                session.sample(p, spacing);
                match std::mem::take(&mut self.state) {
                    DrawState::Collecting(session) => self.finish(session),
                    DrawState::Idle => DrawOutcome::Ignored,
                }
            }
            (Phase::Move | Phase::Up, DrawState::Idle) => DrawOutcome::Ignored,
        }
    }

    fn finish(&self, session: DrawingSession) -> DrawOutcome {
        let tool = session.tool();
        let mut points = session.into_points();
        let n = points.len();
        if n < tool.min_points() {
            debug!(?tool, points = n, "stroke too short, discarded");
            return DrawOutcome::Discarded { points: n };
        }
        let shape = match tool {
            Tool::Area => {
                let closes = distance(points[0], points[n - 1]) <= self.cfg.closing_distance();
                if closes && n > 3 {
                    // the trailing sample duplicates the start
                    points.pop();
                    Polygon::new(points).map(|polygon| Shape::Area { polygon })
                } else {
                    Polyline::new(points).map(|polyline| Shape::Linear { polyline })
                }
            }
            Tool::Linear => Polyline::new(points).map(|polyline| Shape::Linear { polyline }),
            Tool::Waterline => Polyline::new(points)
                .and_then(|polyline| Shape::waterline(polyline, self.cfg.default_band_height_m)),
            Tool::Hand | Tool::Eraser => return DrawOutcome::Ignored,
        };
        match shape {
            Ok(shape) => {
                debug!(?tool, kind = ?shape.kind(), points = shape.points().len(), "stroke committed");
                DrawOutcome::Committed(MaskDraft::new(shape))
            }
            Err(err) => {
                warn!(?tool, %err, "stroke did not form valid geometry");
                DrawOutcome::Discarded { points: n }
            }
        }
    }
}
