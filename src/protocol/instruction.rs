use serde::{Deserialize, Serialize};

use crate::core::{Figure, FrameRef};
use crate::error::FigureResult;
use crate::interaction::TransitionSpec;

use super::{LayoutPatch, TracePatch};

/// Trace addressing for restyle/update.
///
/// Indices are strictly positional. Uids are resolved to positions when the
/// instruction is evaluated, so bindings written against uids survive trace
/// reordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraceSelector {
    Indices(Vec<usize>),
    Uids(Vec<String>),
}

impl From<Vec<usize>> for TraceSelector {
    fn from(value: Vec<usize>) -> Self {
        Self::Indices(value)
    }
}

/// Frames an `animate` instruction targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimateTarget {
    Frame(FrameRef),
    /// Plays the listed frames in order; an empty list pauses playback.
    Sequence(Vec<FrameRef>),
    /// Plays every frame in figure order.
    All,
}

impl AnimateTarget {
    #[must_use]
    pub fn frame(frame: impl Into<FrameRef>) -> Self {
        Self::Frame(frame.into())
    }

    #[must_use]
    pub fn pause() -> Self {
        Self::Sequence(Vec::new())
    }
}

/// Serializable update protocol call, as bound to menus and sliders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Instruction {
    Restyle {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        traces: Option<TraceSelector>,
        patch: TracePatch,
    },
    Relayout {
        patch: LayoutPatch,
    },
    Update {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        traces: Option<TraceSelector>,
        #[serde(default)]
        trace_patch: TracePatch,
        #[serde(default)]
        layout_patch: LayoutPatch,
    },
    Animate {
        target: AnimateTarget,
        #[serde(default)]
        transition: TransitionSpec,
    },
    Skip,
}

impl Instruction {
    #[must_use]
    pub fn restyle(patch: TracePatch) -> Self {
        Self::Restyle {
            traces: None,
            patch,
        }
    }

    #[must_use]
    pub fn restyle_traces(traces: impl Into<TraceSelector>, patch: TracePatch) -> Self {
        Self::Restyle {
            traces: Some(traces.into()),
            patch,
        }
    }

    #[must_use]
    pub fn relayout(patch: LayoutPatch) -> Self {
        Self::Relayout { patch }
    }

    #[must_use]
    pub fn update(trace_patch: TracePatch, layout_patch: LayoutPatch) -> Self {
        Self::Update {
            traces: None,
            trace_patch,
            layout_patch,
        }
    }

    #[must_use]
    pub fn animate(target: AnimateTarget, transition: TransitionSpec) -> Self {
        Self::Animate { target, transition }
    }

    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Restyle { .. } => "restyle",
            Self::Relayout { .. } => "relayout",
            Self::Update { .. } => "update",
            Self::Animate { .. } => "animate",
            Self::Skip => "skip",
        }
    }

    /// Checks that the instruction is addressable against `figure` as it is
    /// now: selectors resolve, per-trace arrays have one entry per trace,
    /// patched axes exist and animate targets name existing frames.
    pub fn validate_binding(&self, figure: &Figure) -> FigureResult<()> {
        match self {
            Self::Restyle { traces, patch } => {
                figure.resolve_traces(traces.as_ref())?;
                check_trace_patch(figure, patch)
            }
            Self::Relayout { patch } => patch.check_axes(figure.layout()),
            Self::Update {
                traces,
                trace_patch,
                layout_patch,
            } => {
                figure.resolve_traces(traces.as_ref())?;
                check_trace_patch(figure, trace_patch)?;
                layout_patch.check_axes(figure.layout())
            }
            Self::Animate { target, .. } => match target {
                AnimateTarget::Frame(frame) => figure.frames().resolve(frame).map(|_| ()),
                AnimateTarget::Sequence(frames) => frames
                    .iter()
                    .try_for_each(|frame| figure.frames().resolve(frame).map(|_| ())),
                AnimateTarget::All => Ok(()),
            },
            Self::Skip => Ok(()),
        }
    }
}

fn check_trace_patch(figure: &Figure, patch: &TracePatch) -> FigureResult<()> {
    if let Some(visible) = &patch.visible {
        visible.check_len(figure.trace_count())?;
    }
    Ok(())
}
