//! Update protocol: pure transforms from `(Figure, instruction)` to a new
//! `Figure` plus the `RenderDelta` a renderer needs.
//!
//! Every transform works on a private candidate copy. An error therefore
//! never leaves a partially patched figure behind.

mod animate;
mod delta;
mod instruction;
mod patch;
mod relayout;
mod restyle;
mod update;

pub use animate::animate;
pub use delta::{
    InvalidationLevel, InvalidationMask, InvalidationTopic, InvalidationTopics, RenderDelta,
    TraceIndices,
};
pub use instruction::{AnimateTarget, Instruction, TraceSelector};
pub use patch::{AxisPatch, FontPatch, LayoutPatch, LegendPatch, TracePatch, VisibleArg};
pub use relayout::relayout;
pub use restyle::restyle;
pub use update::update;

use tracing::debug;

use crate::core::Figure;
use crate::error::FigureResult;

/// Evaluates `instruction` against `figure` without touching it.
pub fn apply(figure: &Figure, instruction: &Instruction) -> FigureResult<(Figure, RenderDelta)> {
    match instruction {
        Instruction::Restyle { traces, patch } => restyle(figure, traces.as_ref(), patch),
        Instruction::Relayout { patch } => relayout(figure, patch),
        Instruction::Update {
            traces,
            trace_patch,
            layout_patch,
        } => update(figure, traces.as_ref(), trace_patch, layout_patch),
        Instruction::Animate { target, transition } => animate(figure, target, transition),
        Instruction::Skip => Ok((figure.clone(), RenderDelta::none())),
    }
}

impl Figure {
    /// Applies `instruction` in place, all-or-nothing.
    ///
    /// On error `self` is exactly as it was before the call.
    pub fn apply(&mut self, instruction: &Instruction) -> FigureResult<RenderDelta> {
        let (next, delta) = apply(self, instruction)?;
        debug!(
            method = instruction.method(),
            level = ?delta.mask.level(),
            traces = delta.traces.len(),
            "instruction committed"
        );
        *self = next;
        Ok(delta)
    }
}
