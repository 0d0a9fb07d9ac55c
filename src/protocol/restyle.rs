use tracing::trace;

use crate::core::{AxisRef, Figure};
use crate::error::FigureResult;

use super::{RenderDelta, TracePatch, TraceSelector};

/// Applies `patch` to the selected traces (all traces when `traces` is
/// `None`) and returns the patched figure.
///
/// Fails with `IndexOutOfRange` for an index past the trace count,
/// `ShapeMismatch` for a `visible` array whose length differs from the trace
/// count, and `PayloadKindMismatch` when a kind change does not fit the
/// payload. `figure` is never modified.
pub fn restyle(
    figure: &Figure,
    traces: Option<&TraceSelector>,
    patch: &TracePatch,
) -> FigureResult<(Figure, RenderDelta)> {
    let mut next = figure.clone();
    let delta = restyle_in_place(&mut next, traces, patch)?;
    next.validate()?;
    Ok((next, delta))
}

/// Restyles a candidate figure owned by the caller; the caller validates and
/// discards the candidate on error.
pub(super) fn restyle_in_place(
    candidate: &mut Figure,
    traces: Option<&TraceSelector>,
    patch: &TracePatch,
) -> FigureResult<RenderDelta> {
    let indices = candidate.resolve_traces(traces)?;
    if let Some(visible) = &patch.visible {
        visible.check_len(candidate.trace_count())?;
    }
    if patch.is_empty() {
        return Ok(RenderDelta::none());
    }

    for &index in &indices {
        let was_axis_less = candidate.traces()[index].is_axis_less();
        patch.apply_to(&mut candidate.traces_mut()[index], index)?;
        let crossed = candidate.traces()[index].is_axis_less() != was_axis_less;
        if crossed && patch.axis_ref.is_none() {
            rebind_after_kind_change(candidate, index)?;
        }
    }
    trace!(traces = indices.len(), "restyle applied to candidate");

    Ok(RenderDelta {
        mask: patch.invalidation(),
        traces: indices,
        transition: None,
    })
}

/// Moves a trace whose kind crossed the axis-less boundary between its cell's
/// axes and its cell's paper domain.
///
/// A trace turning xy is bound to the axes of the cell at its domain (the
/// cell gets a new pair when it had none), or to the primary axes when no
/// cell matches.
fn rebind_after_kind_change(candidate: &mut Figure, index: usize) -> FigureResult<()> {
    let trace = &candidate.traces()[index];
    if trace.is_axis_less() {
        let domain = trace.domain.or_else(|| {
            trace
                .axis_ref
                .and_then(|axis_ref| candidate.layout().cell_for_axes(axis_ref))
                .map(|cell| cell.domain)
        });
        let trace = &mut candidate.traces_mut()[index];
        trace.axis_ref = None;
        trace.domain = domain;
        return Ok(());
    }

    let domain = trace.domain;
    let cell_axes = match domain {
        Some(domain) => candidate.layout_mut().cell_axes_at_domain(domain)?,
        None => None,
    };
    let axis_ref = cell_axes.unwrap_or_else(AxisRef::primary);
    candidate.layout_mut().ensure_axis_pair(axis_ref);
    let trace = &mut candidate.traces_mut()[index];
    trace.axis_ref = Some(axis_ref);
    trace.domain = None;
    Ok(())
}
