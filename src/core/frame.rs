use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Trace, TracePayload};
use crate::error::{FigureError, FigureResult};
use crate::protocol::LayoutPatch;

/// Named snapshot of trace data for one animation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    /// Replacement payloads keyed by trace index. Traces not listed keep
    /// their base payload.
    #[serde(default)]
    pub traces: IndexMap<usize, TracePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Frame {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            traces: IndexMap::new(),
            layout: None,
            group: None,
        }
    }

    #[must_use]
    pub fn with_trace(mut self, index: usize, payload: TracePayload) -> Self {
        self.traces.insert(index, payload);
        self
    }

    #[must_use]
    pub fn with_layout(mut self, patch: LayoutPatch) -> Self {
        self.layout = Some(patch);
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub(crate) fn validate_against(&self, traces: &[Trace]) -> FigureResult<()> {
        for (&index, payload) in &self.traces {
            let trace = traces.get(index).ok_or(FigureError::IndexOutOfRange {
                index,
                len: traces.len(),
            })?;
            trace.kind.check_payload(payload)?;
        }
        Ok(())
    }

    /// Writes this frame's payloads over `traces`.
    pub(crate) fn overlay(&self, traces: &mut [Trace]) {
        for (&index, payload) in &self.traces {
            if let Some(trace) = traces.get_mut(index) {
                trace.payload = payload.clone();
            }
        }
    }
}

/// Frame address accepted by `animate`: a name or a position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameRef {
    Index(usize),
    Name(String),
}

impl From<&str> for FrameRef {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for FrameRef {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<usize> for FrameRef {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl fmt::Display for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Ordered frames with unique names; order is playback order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Frame>", into = "Vec<Frame>")]
pub struct FrameSequence {
    frames: IndexMap<String, Frame>,
}

impl FrameSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) -> FigureResult<()> {
        if frame.name.is_empty() {
            return Err(FigureError::InvalidData(
                "frame name must not be empty".to_owned(),
            ));
        }
        if self.frames.contains_key(&frame.name) {
            return Err(FigureError::DuplicateFrame(frame.name));
        }
        self.frames.insert(frame.name.clone(), frame);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Frame> {
        self.frames.get(name)
    }

    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Frame> {
        self.frames.get_index(index).map(|(_, frame)| frame)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.frames.get_index_of(name)
    }

    pub fn resolve(&self, frame_ref: &FrameRef) -> FigureResult<&Frame> {
        let frame = match frame_ref {
            FrameRef::Index(index) => self.get_index(*index),
            FrameRef::Name(name) => self.get(name),
        };
        frame.ok_or_else(|| FigureError::UnknownFrame(frame_ref.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }
}

impl TryFrom<Vec<Frame>> for FrameSequence {
    type Error = FigureError;

    fn try_from(value: Vec<Frame>) -> Result<Self, Self::Error> {
        let mut sequence = Self::new();
        for frame in value {
            sequence.push(frame)?;
        }
        Ok(sequence)
    }
}

impl From<FrameSequence> for Vec<Frame> {
    fn from(value: FrameSequence) -> Self {
        value.frames.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Frame, FrameRef, FrameSequence};
    use crate::error::FigureError;

    #[test]
    fn duplicate_frame_names_are_rejected() {
        let mut frames = FrameSequence::new();
        frames.push(Frame::new("1902")).expect("first");
        let err = frames.push(Frame::new("1902")).expect_err("duplicate");
        assert_eq!(err, FigureError::DuplicateFrame("1902".to_owned()));
    }

    #[test]
    fn frames_resolve_by_name_and_position() {
        let frames =
            FrameSequence::try_from(vec![Frame::new("a"), Frame::new("b")]).expect("frames");
        assert_eq!(frames.resolve(&FrameRef::from(1)).expect("index").name, "b");
        assert_eq!(frames.resolve(&FrameRef::from("a")).expect("name").name, "a");
        assert!(matches!(
            frames.resolve(&FrameRef::from("c")),
            Err(FigureError::UnknownFrame(_))
        ));
    }
}
