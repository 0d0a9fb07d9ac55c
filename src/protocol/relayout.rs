use crate::core::Figure;
use crate::error::FigureResult;

use super::{LayoutPatch, RenderDelta};

/// Deep-merges `patch` into the layout and returns the patched figure.
///
/// Applying the same patch twice yields the same layout as applying it once.
pub fn relayout(figure: &Figure, patch: &LayoutPatch) -> FigureResult<(Figure, RenderDelta)> {
    let mut next = figure.clone();
    let delta = relayout_in_place(&mut next, patch)?;
    next.validate()?;
    Ok((next, delta))
}

pub(super) fn relayout_in_place(
    candidate: &mut Figure,
    patch: &LayoutPatch,
) -> FigureResult<RenderDelta> {
    if patch.is_empty() {
        return Ok(RenderDelta::none());
    }
    patch.merge_into(candidate.layout_mut())?;
    Ok(RenderDelta {
        mask: patch.invalidation(),
        ..RenderDelta::none()
    })
}
