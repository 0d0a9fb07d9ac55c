use crate::core::Figure;
use crate::error::FigureResult;

use super::relayout::relayout_in_place;
use super::restyle::restyle_in_place;
use super::{LayoutPatch, RenderDelta, TracePatch, TraceSelector};

/// Restyle and relayout as one all-or-nothing step.
///
/// Both halves are applied to the same candidate and the candidate is
/// validated once; if either half fails the caller still holds the
/// untouched `figure`.
pub fn update(
    figure: &Figure,
    traces: Option<&TraceSelector>,
    trace_patch: &TracePatch,
    layout_patch: &LayoutPatch,
) -> FigureResult<(Figure, RenderDelta)> {
    let mut next = figure.clone();
    let mut delta = restyle_in_place(&mut next, traces, trace_patch)?;
    delta.merge(relayout_in_place(&mut next, layout_patch)?);
    next.validate()?;
    Ok((next, delta))
}
