use tracing::trace;

use crate::core::Figure;
use crate::error::{FigureError, FigureResult};
use crate::interaction::TransitionSpec;

use super::{AnimateTarget, InvalidationLevel, InvalidationTopic, RenderDelta};

/// Moves the figure's displayed state toward the targeted frame(s).
///
/// Only the playback state changes: base traces and layout are untouched and
/// the displayed state is recomputed from the target frame. Fails with
/// `UnknownFrame` when any referenced frame is missing, in which case no
/// playback change happens.
pub fn animate(
    figure: &Figure,
    target: &AnimateTarget,
    transition: &TransitionSpec,
) -> FigureResult<(Figure, RenderDelta)> {
    let frames = resolve_target(figure, target, transition)?;
    let mut next = figure.clone();
    let previous = next.playback().active_frame().map(ToOwned::to_owned);
    next.playback_mut().request(frames, *transition);
    let delta = frame_change_delta(&next, previous.as_deref());
    trace!(
        target = ?next.playback().active_frame(),
        queued = next.playback().playlist().count(),
        "animate request accepted"
    );
    Ok((next, delta))
}

fn resolve_target(
    figure: &Figure,
    target: &AnimateTarget,
    transition: &TransitionSpec,
) -> FigureResult<Vec<String>> {
    let frames = figure.frames();
    match target {
        AnimateTarget::Frame(frame_ref) => Ok(vec![frames.resolve(frame_ref)?.name.clone()]),
        AnimateTarget::Sequence(frame_refs) => frame_refs
            .iter()
            .map(|frame_ref| frames.resolve(frame_ref).map(|frame| frame.name.clone()))
            .collect(),
        AnimateTarget::All => {
            if frames.is_empty() {
                return Err(FigureError::UnknownFrame(
                    "all frames (figure has none)".to_owned(),
                ));
            }
            let names: Vec<String> = frames.names().map(ToOwned::to_owned).collect();
            let resume_at = transition
                .from_current
                .then(|| figure.playback().active_frame())
                .flatten()
                .and_then(|current| frames.position(current))
                .map(|position| position + 1)
                .filter(|start| *start < names.len());
            Ok(match resume_at {
                Some(start) => names[start..].to_vec(),
                None => names,
            })
        }
    }
}

/// Delta between the frame displayed before and after a playback change.
fn frame_change_delta(figure: &Figure, previous: Option<&str>) -> RenderDelta {
    let current = figure.playback().active_frame();
    if current == previous && !figure.playback().state().is_transitioning() {
        return RenderDelta::none();
    }

    let mut delta = RenderDelta::none();
    delta
        .mask
        .raise(InvalidationLevel::Plot, InvalidationTopic::Animation);
    for name in [previous, current].into_iter().flatten() {
        let Some(frame) = figure.frames().get(name) else {
            continue;
        };
        for &index in frame.traces.keys() {
            if !delta.traces.contains(&index) {
                delta.traces.push(index);
            }
        }
        if frame.layout.is_some() {
            delta
                .mask
                .raise(InvalidationLevel::Plot, InvalidationTopic::Layout);
        }
    }
    if !delta.traces.is_empty() {
        delta
            .mask
            .raise(InvalidationLevel::Plot, InvalidationTopic::Traces);
    }
    if figure.playback().state().is_transitioning() {
        delta.transition = Some(figure.playback().spec());
    }
    delta
}

impl Figure {
    /// Feeds the renderer's clock into the playback state machine.
    ///
    /// Completes transitions whose duration has elapsed and starts the next
    /// playlist frame once the current one has been held long enough.
    pub fn advance_playback(&mut self, delta_ms: u64) -> RenderDelta {
        let previous = self.playback().active_frame().map(ToOwned::to_owned);
        if !self.playback_mut().advance(delta_ms) {
            return RenderDelta::none();
        }
        trace!(
            delta_ms,
            frame = ?self.playback().active_frame(),
            "playback advanced"
        );
        frame_change_delta(self, previous.as_deref())
    }
}
