//! `MaskStore`: ordered masks plus linear undo/redo.

use std::collections::HashSet;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::{Error, GeometryFault, Result};

use super::history::{History, Inverse, DEFAULT_HISTORY_DEPTH};
use super::mask::{check_band_height, Mask, MaskDraft, MaskId, Shape};

/// Insertion-ordered masks for one document.
///
/// Invariants:
/// - Ids are unique; `selected` (if any) names a live mask.
/// - Every mutating call except `select` records exactly one inverse.
/// - Not meant for shared mutation: a document owns exactly one store.
#[derive(Clone, Debug)]
pub struct MaskStore {
    masks: Vec<Mask>,
    selected: Option<MaskId>,
    history: History,
    rng: StdRng,
}

impl Default for MaskStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl MaskStore {
    /// Empty store with entropy-seeded id generation.
    pub fn new(history_depth: usize) -> Self {
        Self::from_rng(history_depth, StdRng::from_entropy())
    }

    /// Empty store with reproducible ids.
    pub fn with_seed(history_depth: usize, seed: u64) -> Self {
        Self::from_rng(history_depth, StdRng::seed_from_u64(seed))
    }

    fn from_rng(history_depth: usize, rng: StdRng) -> Self {
        Self {
            masks: Vec::new(),
            selected: None,
            history: History::new(history_depth),
            rng,
        }
    }

    /// Load previously committed masks (ids and timestamps kept, history empty).
    pub fn from_masks(masks: Vec<Mask>, history_depth: usize) -> Result<Self> {
        Self::load(masks, history_depth, StdRng::from_entropy())
    }

    /// `from_masks` with reproducible ids for masks added after the load.
    pub fn from_masks_seeded(masks: Vec<Mask>, history_depth: usize, seed: u64) -> Result<Self> {
        Self::load(masks, history_depth, StdRng::seed_from_u64(seed))
    }

    fn load(masks: Vec<Mask>, history_depth: usize, rng: StdRng) -> Result<Self> {
        let mut seen = HashSet::with_capacity(masks.len());
        for m in &masks {
            if !seen.insert(m.id()) {
                return Err(GeometryFault::DuplicateId(m.id()).into());
            }
            m.shape().validate()?;
        }
        let mut store = Self::from_rng(history_depth, rng);
        store.masks = masks;
        Ok(store)
    }

    /// All masks in insertion order.
    #[inline]
    pub fn list(&self) -> &[Mask] {
        &self.masks
    }

    pub fn get(&self, id: MaskId) -> Option<&Mask> {
        self.masks.iter().find(|m| m.id() == id)
    }

    pub fn position(&self, id: MaskId) -> Option<usize> {
        self.masks.iter().position(|m| m.id() == id)
    }

    pub fn contains(&self, id: MaskId) -> bool {
        self.position(id).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    #[inline]
    pub fn selected(&self) -> Option<MaskId> {
        self.selected
    }

    pub fn can_undo(&self) -> bool {
        self.history.undo_len() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history.redo_len() > 0
    }

    pub fn undo_len(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.history.redo_len()
    }

    /// Drop all undo/redo records (masks untouched).
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn fresh_id(&mut self) -> MaskId {
        loop {
            let id = MaskId(self.rng.gen());
            if id.0 != 0 && !self.contains(id) {
                return id;
            }
        }
    }

    fn index_of(&self, id: MaskId) -> Result<usize> {
        self.position(id).ok_or(Error::NotFound(id))
    }

    /// Commit a new mask at the end of the list.
    pub fn insert(&mut self, draft: MaskDraft) -> Result<MaskId> {
        draft.shape.validate()?;
        let id = self.fresh_id();
        let mask = Mask::from_draft(id, draft, Utc::now());
        debug!(%id, kind = ?mask.kind(), points = mask.shape().points().len(), "insert mask");
        self.masks.push(mask);
        self.history.record(Inverse::Remove { id });
        Ok(id)
    }

    /// Remove a mask; undo puts it back at the same index.
    pub fn remove(&mut self, id: MaskId) -> Result<Mask> {
        let index = self.index_of(id)?;
        let mask = self.take_at(index);
        debug!(%id, index, "remove mask");
        self.history.record(Inverse::Restore {
            mask: mask.clone(),
            index,
        });
        Ok(mask)
    }

    /// Swap in new geometry of the same variant.
    pub fn replace_geometry(&mut self, id: MaskId, shape: Shape) -> Result<()> {
        let index = self.index_of(id)?;
        let expected = self.masks[index].kind();
        if shape.kind() != expected {
            return Err(Error::TypeMismatch {
                id,
                expected,
                found: shape.kind(),
            });
        }
        shape.validate()?;
        let prev = self.masks[index].set_shape(shape, Utc::now());
        debug!(%id, "replace geometry");
        self.history.record(Inverse::Reshape { id, shape: prev });
        Ok(())
    }

    /// Change a waterline band's height.
    pub fn set_band_height(&mut self, id: MaskId, band_height_m: f64) -> Result<()> {
        let index = self.index_of(id)?;
        let mask = &self.masks[index];
        let Shape::WaterlineBand { polyline, .. } = mask.shape() else {
            return Err(Error::TypeMismatch {
                id,
                expected: mask.kind(),
                found: super::MaskKind::WaterlineBand,
            });
        };
        check_band_height(band_height_m)?;
        let shape = Shape::WaterlineBand {
            polyline: polyline.clone(),
            band_height_m,
        };
        self.replace_geometry(id, shape)
    }

    /// Assign (or clear) the material reference. Not validated here.
    pub fn set_material(&mut self, id: MaskId, material_id: Option<String>) -> Result<()> {
        let index = self.index_of(id)?;
        let prev = self.masks[index].set_material(material_id, Utc::now());
        self.history.record(Inverse::Rematerial {
            id,
            material_id: prev,
        });
        Ok(())
    }

    /// Change the selection. Not recorded in history.
    pub fn select(&mut self, id: Option<MaskId>) -> Result<()> {
        if let Some(id) = id {
            self.index_of(id)?;
        }
        self.selected = id;
        Ok(())
    }

    /// Revert the most recent edit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(inverse) = self.history.pop_undo() else {
            return false;
        };
        if let Some(redo) = self.apply(inverse) {
            self.history.push_redo(redo);
        }
        true
    }

    /// Re-apply the most recently undone edit. `false` when redo is empty.
    pub fn redo(&mut self) -> bool {
        let Some(inverse) = self.history.pop_redo() else {
            return false;
        };
        if let Some(undo) = self.apply(inverse) {
            self.history.push_undo(undo);
        }
        true
    }

    fn take_at(&mut self, index: usize) -> Mask {
        let mask = self.masks.remove(index);
        if self.selected == Some(mask.id()) {
            self.selected = None;
        }
        mask
    }

    /// Execute an inverse record and return the record that reverts it.
    fn apply(&mut self, inverse: Inverse) -> Option<Inverse> {
        match inverse {
            Inverse::Remove { id } => {
                let Some(index) = self.position(id) else {
                    warn!(%id, "history references a missing mask");
                    return None;
                };
                let mask = self.take_at(index);
                Some(Inverse::Restore { mask, index })
            }
            Inverse::Restore { mask, index } => {
                let id = mask.id();
                let index = index.min(self.masks.len());
                self.masks.insert(index, mask);
                Some(Inverse::Remove { id })
            }
            Inverse::Reshape { id, shape } => {
                let Some(index) = self.position(id) else {
                    warn!(%id, "history references a missing mask");
                    return None;
                };
                let prev = self.masks[index].set_shape(shape, Utc::now());
                Some(Inverse::Reshape { id, shape: prev })
            }
            Inverse::Rematerial { id, material_id } => {
                let Some(index) = self.position(id) else {
                    warn!(%id, "history references a missing mask");
                    return None;
                };
                let prev = self.masks[index].set_material(material_id, Utc::now());
                Some(Inverse::Rematerial {
                    id,
                    material_id: prev,
                })
            }
        }
    }
}
