//! Drawing state machine and eraser hit-testing.
//!
//! Purpose
//! - Accumulate pointer samples for the active tool into a candidate path and
//!   turn it into a `MaskDraft` on pointer-up, headless and UI-agnostic.
//!
//! Assumptions and conventions
//! - Coordinates arrive in image pixels; the host maps screen → image.
//! - Samples are applied strictly in arrival order.
//! - Too-short gestures vanish silently; they are ordinary clicks, not errors.
//!
//! Code cross-refs: `DrawMachine`, `DrawState`, `hit_test`.

mod hit;
mod machine;
mod types;

pub use hit::hit_test;
pub use machine::{DrawMachine, DrawOutcome, DrawState};
pub use types::{DrawingSession, Phase, PointerEvent, Tool};
