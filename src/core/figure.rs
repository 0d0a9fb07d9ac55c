use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{AxisRef, Domain, Frame, FrameSequence, Layout, SubplotCell, Trace};
use crate::error::{FigureError, FigureResult};
use crate::interaction::AnimationPlayback;
use crate::protocol::{TraceIndices, TraceSelector};

/// Traces, layout and frames of one chart, plus its animation playback state.
///
/// A `Figure` value always satisfies its invariants: it can only be obtained
/// from `FigureBuilder`, validated deserialization, or protocol transforms
/// that validate their result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FigureParts")]
pub struct Figure {
    traces: Vec<Trace>,
    layout: Layout,
    frames: FrameSequence,
    playback: AnimationPlayback,
}

#[derive(Deserialize)]
struct FigureParts {
    traces: Vec<Trace>,
    #[serde(default)]
    layout: Layout,
    #[serde(default)]
    frames: FrameSequence,
    #[serde(default)]
    playback: AnimationPlayback,
}

impl TryFrom<FigureParts> for Figure {
    type Error = FigureError;

    fn try_from(parts: FigureParts) -> Result<Self, Self::Error> {
        let figure = Self {
            traces: parts.traces,
            layout: parts.layout,
            frames: parts.frames,
            playback: parts.playback,
        };
        figure.validate()?;
        Ok(figure)
    }
}

impl Figure {
    #[must_use]
    pub fn builder() -> FigureBuilder {
        FigureBuilder::new()
    }

    #[must_use]
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    #[must_use]
    pub fn trace(&self, index: usize) -> Option<&Trace> {
        self.traces.get(index)
    }

    #[must_use]
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    #[must_use]
    pub fn playback(&self) -> &AnimationPlayback {
        &self.playback
    }

    pub(crate) fn traces_mut(&mut self) -> &mut [Trace] {
        &mut self.traces
    }

    pub(crate) fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    pub(crate) fn playback_mut(&mut self) -> &mut AnimationPlayback {
        &mut self.playback
    }

    /// Resolves a selector to trace positions; `None` selects every trace.
    pub fn resolve_traces(&self, selector: Option<&TraceSelector>) -> FigureResult<TraceIndices> {
        let len = self.traces.len();
        match selector {
            None => Ok((0..len).collect()),
            Some(TraceSelector::Indices(indices)) => {
                let mut resolved = TraceIndices::with_capacity(indices.len());
                for &index in indices {
                    if index >= len {
                        return Err(FigureError::IndexOutOfRange { index, len });
                    }
                    if !resolved.contains(&index) {
                        resolved.push(index);
                    }
                }
                Ok(resolved)
            }
            Some(TraceSelector::Uids(uids)) => uids
                .iter()
                .map(|uid| {
                    self.traces
                        .iter()
                        .position(|trace| trace.uid.as_deref() == Some(uid.as_str()))
                        .ok_or_else(|| FigureError::UnknownTraceUid(uid.clone()))
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn active_frame(&self) -> Option<&Frame> {
        self.playback
            .active_frame()
            .and_then(|name| self.frames.get(name))
    }

    /// Base traces overlaid with the snapshots of the active frame.
    #[must_use]
    pub fn displayed_traces(&self) -> Vec<Trace> {
        let mut traces = self.traces.clone();
        if let Some(frame) = self.active_frame() {
            frame.overlay(&mut traces);
        }
        traces
    }

    /// Base layout merged with the layout patch of the active frame.
    #[must_use]
    pub fn displayed_layout(&self) -> Layout {
        let mut layout = self.layout.clone();
        if let Some(patch) = self.active_frame().and_then(|frame| frame.layout.as_ref()) {
            if let Err(err) = patch.merge_into(&mut layout) {
                warn!(error = %err, "skipping frame layout patch that no longer resolves");
                return self.layout.clone();
            }
        }
        layout
    }

    /// Checks every figure invariant.
    pub fn validate(&self) -> FigureResult<()> {
        self.layout.validate()?;

        let mut uids = HashSet::new();
        for (index, trace) in self.traces.iter().enumerate() {
            trace.validate()?;
            match trace.axis_ref {
                Some(_) if trace.is_axis_less() => {
                    return Err(FigureError::AxisRefResolution(format!(
                        "trace {index} ({}) is drawn on paper and cannot reference axes",
                        trace.kind
                    )));
                }
                Some(axis_ref) => self.layout.resolve_axis_ref(axis_ref)?,
                None if !trace.is_axis_less() => {
                    return Err(FigureError::AxisRefResolution(format!(
                        "trace {index} ({}) has no axis reference",
                        trace.kind
                    )));
                }
                None => {}
            }
            if let Some(uid) = &trace.uid {
                if !uids.insert(uid.as_str()) {
                    return Err(FigureError::InvalidData(format!(
                        "trace uid `{uid}` is used more than once"
                    )));
                }
            }
        }

        for frame in self.frames.iter() {
            frame.validate_against(&self.traces)?;
            if let Some(patch) = &frame.layout {
                let mut layout = self.layout.clone();
                patch.merge_into(&mut layout)?;
                layout.validate()?;
            }
        }

        for menu in &self.layout.menus {
            menu.validate_against(self)?;
        }
        for slider in &self.layout.sliders {
            slider.validate_against(self)?;
        }

        for name in [self.playback.active_frame()]
            .into_iter()
            .flatten()
            .chain(self.playback.playlist())
        {
            if self.frames.get(name).is_none() {
                return Err(FigureError::UnknownFrame(name.to_owned()));
            }
        }

        Ok(())
    }
}

/// Assembles and validates a `Figure`.
///
/// Axis-bound traces without an axis reference are bound to the primary
/// `x`/`y` axes, which are created on demand. No partially built figure is
/// ever returned.
#[derive(Debug, Clone, Default)]
pub struct FigureBuilder {
    traces: Vec<Trace>,
    layout: Layout,
    frames: Vec<Frame>,
}

impl FigureBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    #[must_use]
    pub fn traces(mut self, traces: impl IntoIterator<Item = Trace>) -> Self {
        self.traces.extend(traces);
        self
    }

    #[must_use]
    pub fn frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    #[must_use]
    pub fn frames(mut self, frames: impl IntoIterator<Item = Frame>) -> Self {
        self.frames.extend(frames);
        self
    }

    pub fn build(self) -> FigureResult<Figure> {
        let Self {
            mut traces,
            mut layout,
            frames,
        } = self;

        let had_axes = !layout.axes.is_empty();
        let mut bound_default = false;
        for trace in &mut traces {
            if trace.axis_ref.is_none() && !trace.is_axis_less() {
                trace.axis_ref = Some(AxisRef::primary());
                bound_default = true;
            }
        }
        if bound_default {
            layout.ensure_axis_pair(AxisRef::primary());
            if !had_axes && layout.cells.is_empty() {
                layout.cells.push(SubplotCell {
                    row: 1,
                    col: 1,
                    domain: Domain::full(),
                    axes: Some(AxisRef::primary()),
                });
            }
        }

        let figure = Figure {
            traces,
            layout,
            frames: FrameSequence::try_from(frames)?,
            playback: AnimationPlayback::default(),
        };
        figure.validate()?;
        debug!(
            traces = figure.trace_count(),
            axes = figure.layout.axes.len(),
            frames = figure.frames.len(),
            "figure built"
        );
        Ok(figure)
    }
}
