//! Replay scripts: a JSON list of UI steps driven through a `Document`.
//!
//! Steps mirror what a front end would send (tool switches, raw pointer
//! events, calibration triggers). `stroke` is shorthand for down, moves, up.

use anyhow::{anyhow, Context, Result};
use maskcal::calib::GroundStep;
use maskcal::draw::{PointerEvent, Tool};
use maskcal::store::MaskId;
use maskcal::{Document, Point, PointerOutcome};
use serde::{Deserialize, Serialize};

type Xy = [f64; 2];

fn pt([x, y]: Xy) -> Point {
    Point::new(x, y)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Tool { tool: Tool },
    Pointer(PointerEvent),
    Stroke { tool: Tool, points: Vec<Xy> },
    Cancel,
    Undo,
    Redo,
    Calibrate { p1: Xy, p2: Xy, length_m: f64 },
    Ground { corners: [Xy; 4], width_m: f64 },
    Erase { x: f64, y: f64 },
    /// Applies to the most recently committed mask.
    Material { material_id: Option<String> },
    /// Applies to the most recently committed mask.
    BandHeight { height_m: f64 },
}

/// What a replay did, for logging and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplayLog {
    pub committed: Vec<MaskId>,
    pub discarded: usize,
    pub erased: Vec<MaskId>,
}

pub fn replay(doc: &mut Document, steps: &[Step]) -> Result<ReplayLog> {
    let mut log = ReplayLog::default();
    for (i, step) in steps.iter().enumerate() {
        apply(doc, step, &mut log).with_context(|| format!("step {i} ({step:?})"))?;
    }
    tracing::info!(
        steps = steps.len(),
        committed = log.committed.len(),
        discarded = log.discarded,
        erased = log.erased.len(),
        masks = doc.store().len(),
        "replay finished"
    );
    Ok(log)
}

fn apply(doc: &mut Document, step: &Step, log: &mut ReplayLog) -> Result<()> {
    match step {
        Step::Tool { tool } => doc.set_tool(*tool),
        Step::Pointer(ev) => record(doc.pointer(*ev)?, log),
        Step::Stroke { tool, points } => {
            let (first, rest) = points
                .split_first()
                .ok_or_else(|| anyhow!("stroke without points"))?;
            doc.set_tool(*tool);
            doc.pointer(PointerEvent::down(first[0], first[1]))?;
            let last = rest.last().unwrap_or(first);
            for p in rest.iter().take(rest.len().saturating_sub(1)) {
                doc.pointer(PointerEvent::moved(p[0], p[1]))?;
            }
            record(doc.pointer(PointerEvent::up(last[0], last[1]))?, log);
        }
        Step::Cancel => {
            doc.cancel();
        }
        Step::Undo => {
            doc.undo();
        }
        Step::Redo => {
            doc.redo();
        }
        Step::Calibrate { p1, p2, length_m } => {
            doc.calibrate_two_point(pt(*p1), pt(*p2), *length_m)?;
        }
        Step::Ground { corners, width_m } => {
            for c in corners {
                if let GroundStep::Ready(pose) = doc.ground_click(pt(*c))? {
                    tracing::debug!(
                        rotation = pose.rotation(),
                        aspect = pose.aspect(),
                        "ground plane ready"
                    );
                }
            }
            doc.apply_ground_pose(*width_m)?;
        }
        Step::Erase { x, y } => {
            if let Some(id) = doc.erase_at(Point::new(*x, *y))? {
                log.erased.push(id);
            }
        }
        Step::Material { material_id } => {
            let id = last_committed(log)?;
            doc.store_mut().set_material(id, material_id.clone())?;
        }
        Step::BandHeight { height_m } => {
            let id = last_committed(log)?;
            doc.store_mut().set_band_height(id, *height_m)?;
        }
    }
    Ok(())
}

fn record(outcome: PointerOutcome, log: &mut ReplayLog) {
    match outcome {
        PointerOutcome::Committed(id) => log.committed.push(id),
        PointerOutcome::Discarded => log.discarded += 1,
        PointerOutcome::EraseCandidate(hit) => {
            tracing::debug!(hit = ?hit, "eraser candidate (use an erase step to delete)")
        }
        PointerOutcome::Ignored | PointerOutcome::Drawing => {}
    }
}

fn last_committed(log: &ReplayLog) -> Result<MaskId> {
    log.committed
        .last()
        .copied()
        .ok_or_else(|| anyhow!("no mask committed yet"))
}
