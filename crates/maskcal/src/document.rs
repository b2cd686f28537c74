//! One open photo: the owner of store, calibration, drawing and metrics.
//!
//! A `Document` is constructed per photo and passed around explicitly; there
//! are no globals. Every mutation takes `&mut self`, so a multi-threaded host
//! routes calls through whichever thread owns the document.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calib::{
    solve_two_point, ActiveCalibration, Calibration, CalibrationId, GroundCollector, GroundStep,
    PlanePose,
};
use crate::config::EngineCfg;
use crate::draw::{hit_test, DrawMachine, DrawOutcome, DrawingSession, PointerEvent, Tool};
use crate::error::{CalibrationFault, Result};
use crate::geom::Point;
use crate::metrics::{MaskMetrics, MaterialTotals, MetricsProjector};
use crate::store::{Mask, MaskId, MaskStore};

/// Serializable state handed to an external persistence layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub masks: Vec<Mask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<Calibration>,
}

/// Result of routing one pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
    Ignored,
    /// A stroke is open and collecting samples.
    Drawing,
    Committed(MaskId),
    /// The stroke ended without producing a mask.
    Discarded,
    /// Eraser press; the hit mask (if any) is the delete candidate.
    EraseCandidate(Option<MaskId>),
}

#[derive(Clone, Debug)]
pub struct Document {
    cfg: EngineCfg,
    store: MaskStore,
    calibration: Option<ActiveCalibration>,
    calibration_seq: u64,
    draw: DrawMachine,
    ground: GroundCollector,
    ground_pose: Option<PlanePose>,
    projector: MetricsProjector,
}

impl Document {
    pub fn new(cfg: EngineCfg) -> Self {
        Self::with_store(cfg, MaskStore::new(cfg.history_depth))
    }

    /// Reproducible mask ids (tests, replays).
    pub fn with_seed(cfg: EngineCfg, seed: u64) -> Self {
        Self::with_store(cfg, MaskStore::with_seed(cfg.history_depth, seed))
    }

    fn with_store(cfg: EngineCfg, store: MaskStore) -> Self {
        Self {
            cfg,
            store,
            calibration: None,
            calibration_seq: 0,
            draw: DrawMachine::new(cfg),
            ground: GroundCollector::new(),
            ground_pose: None,
            projector: MetricsProjector::new(&cfg),
        }
    }

    /// Rebuild from a snapshot. History starts empty.
    pub fn from_snapshot(snapshot: Snapshot, cfg: EngineCfg) -> Result<Self> {
        let store = MaskStore::from_masks(snapshot.masks, cfg.history_depth)?;
        Ok(Self::load(snapshot.calibration, cfg, store))
    }

    /// `from_snapshot` with reproducible ids for masks drawn after the load.
    pub fn from_snapshot_seeded(snapshot: Snapshot, cfg: EngineCfg, seed: u64) -> Result<Self> {
        let store = MaskStore::from_masks_seeded(snapshot.masks, cfg.history_depth, seed)?;
        Ok(Self::load(snapshot.calibration, cfg, store))
    }

    fn load(calibration: Option<Calibration>, cfg: EngineCfg, store: MaskStore) -> Self {
        let mut doc = Self::with_store(cfg, store);
        if let Some(cal) = calibration {
            doc.set_calibration(cal);
        }
        info!(masks = doc.store.len(), calibrated = doc.calibration.is_some(), "document loaded");
        doc
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            masks: self.store.list().to_vec(),
            calibration: self.calibration().cloned(),
        }
    }

    pub fn cfg(&self) -> &EngineCfg {
        &self.cfg
    }

    pub fn store(&self) -> &MaskStore {
        &self.store
    }

    /// Direct store access for edits the document does not wrap.
    pub fn store_mut(&mut self) -> &mut MaskStore {
        &mut self.store
    }

    // ---- drawing -------------------------------------------------------

    pub fn tool(&self) -> Tool {
        self.draw.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.draw.set_tool(tool);
    }

    pub fn session(&self) -> Option<&DrawingSession> {
        self.draw.session()
    }

    /// Abandon the open stroke, if any.
    pub fn cancel(&mut self) -> bool {
        self.draw.cancel()
    }

    pub fn pointer(&mut self, ev: PointerEvent) -> Result<PointerOutcome> {
        Ok(match self.draw.handle(ev) {
            DrawOutcome::Ignored => PointerOutcome::Ignored,
            DrawOutcome::Started | DrawOutcome::Sampled { .. } => PointerOutcome::Drawing,
            DrawOutcome::Discarded { .. } => PointerOutcome::Discarded,
            DrawOutcome::Committed(draft) => PointerOutcome::Committed(self.store.insert(draft)?),
            DrawOutcome::EraseAt(p) => PointerOutcome::EraseCandidate(self.hit_test(p)),
        })
    }

    /// Topmost mask under `p`.
    pub fn hit_test(&self, p: Point) -> Option<MaskId> {
        hit_test(self.store.list(), p, &self.cfg, self.calibration())
    }

    /// Delete whatever the eraser hits at `p`.
    pub fn erase_at(&mut self, p: Point) -> Result<Option<MaskId>> {
        let Some(id) = self.hit_test(p) else {
            return Ok(None);
        };
        self.store.remove(id)?;
        Ok(Some(id))
    }

    pub fn remove(&mut self, id: MaskId) -> Result<Mask> {
        self.store.remove(id)
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    // ---- calibration ---------------------------------------------------

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref().map(|a| &a.calibration)
    }

    pub fn calibration_id(&self) -> Option<CalibrationId> {
        self.calibration.as_ref().map(|a| a.id)
    }

    /// Install a calibration wholesale; returns its fresh identity.
    pub fn set_calibration(&mut self, calibration: Calibration) -> CalibrationId {
        self.calibration_seq += 1;
        let id = CalibrationId(self.calibration_seq);
        debug!(
            id = id.0,
            pixels_per_meter = calibration.pixels_per_meter(),
            "calibration installed"
        );
        self.calibration = Some(ActiveCalibration { id, calibration });
        id
    }

    pub fn clear_calibration(&mut self) {
        self.calibration = None;
    }

    /// Two-point calibration. On failure the previous calibration stays.
    pub fn calibrate_two_point(&mut self, p1: Point, p2: Point, length_m: f64) -> Result<CalibrationId> {
        let cal = solve_two_point(p1, p2, length_m)?;
        Ok(self.set_calibration(cal))
    }

    /// Feed one ground-plane click; the pose is kept once four are in.
    pub fn ground_click(&mut self, p: Point) -> Result<GroundStep> {
        let step = self.ground.click(p)?;
        if let GroundStep::Ready(pose) = &step {
            self.ground_pose = Some(pose.clone());
        }
        Ok(step)
    }

    pub fn ground_pose(&self) -> Option<&PlanePose> {
        self.ground_pose.as_ref()
    }

    pub fn ground_clicks(&self) -> &[Point] {
        self.ground.collected()
    }

    /// Promote the ground pose to the active scale, given the real width.
    pub fn apply_ground_pose(&mut self, width_m: f64) -> Result<CalibrationId> {
        let pose = self.ground_pose.as_ref().ok_or(CalibrationFault::NotReady {
            collected: self.ground.collected().len(),
        })?;
        let cal = pose.calibration(width_m)?;
        Ok(self.set_calibration(cal))
    }

    // ---- metrics -------------------------------------------------------

    pub fn metrics(&mut self, id: MaskId) -> Result<MaskMetrics> {
        self.projector
            .compute(&self.store, self.calibration.as_ref(), id)
    }

    /// Per-material sums; `None` while uncalibrated.
    pub fn totals(&mut self) -> Option<Vec<MaterialTotals>> {
        self.projector.prune(&self.store);
        self.projector
            .totals_by_material(&self.store, self.calibration.as_ref())
    }
}
