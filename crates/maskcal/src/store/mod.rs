//! Mask store: committed masks, selection, undo/redo.
//!
//! Purpose
//! - The canonical, insertion-ordered list of masks for one document.
//! - Every mutation goes through a method that records its inverse, so undo
//!   memory grows with edit count, not with mask count.
//!
//! Why inverse records (not snapshots)
//! - Shapes are `Arc`-backed values; an inverse record holds at most the one
//!   prior shape or the one removed mask.
//!
//! Code cross-refs: `Mask`, `Shape`, `MaskStore`, `history::History`.

mod collection;
mod history;
mod mask;

pub use collection::MaskStore;
pub use history::DEFAULT_HISTORY_DEPTH;
pub use mask::{Mask, MaskDraft, MaskId, MaskKind, Shape};
