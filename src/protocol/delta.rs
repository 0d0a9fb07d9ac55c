use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::interaction::TransitionSpec;

/// Trace indices touched by one protocol application.
pub type TraceIndices = SmallVec<[usize; 8]>;

/// Ordered redraw classes, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationLevel {
    #[default]
    None,
    /// Cosmetic change: visibility, names, colors, titles.
    Style,
    /// Data or scale change: payloads, axis ranges, animation targets.
    Plot,
    /// Structural change: trace kinds, axis bindings, canvas geometry.
    Full,
}

impl InvalidationLevel {
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if self as u8 >= other as u8 {
            self
        } else {
            other
        }
    }
}

/// Figure area affected by a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationTopic {
    Traces,
    Legend,
    Layout,
    Axes,
    Annotations,
    Controls,
    Animation,
}

impl InvalidationTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Traces => 1 << 0,
            Self::Legend => 1 << 1,
            Self::Layout => 1 << 2,
            Self::Axes => 1 << 3,
            Self::Annotations => 1 << 4,
            Self::Controls => 1 << 5,
            Self::Animation => 1 << 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationTopics {
    bits: u8,
}

impl InvalidationTopics {
    const ALL_BITS: u8 = InvalidationTopic::Traces.bit()
        | InvalidationTopic::Legend.bit()
        | InvalidationTopic::Layout.bit()
        | InvalidationTopic::Axes.bit()
        | InvalidationTopic::Annotations.bit()
        | InvalidationTopic::Controls.bit()
        | InvalidationTopic::Animation.bit();

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn from_topic(topic: InvalidationTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains_topic(self, topic: InvalidationTopic) -> bool {
        (self.bits & topic.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

/// Coalesced redraw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationMask {
    level: InvalidationLevel,
    #[serde(default)]
    topics: InvalidationTopics,
}

impl InvalidationMask {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            level: InvalidationLevel::None,
            topics: InvalidationTopics::none(),
        }
    }

    #[must_use]
    pub const fn full() -> Self {
        Self {
            level: InvalidationLevel::Full,
            topics: InvalidationTopics::all(),
        }
    }

    #[must_use]
    pub const fn new(level: InvalidationLevel, topic: InvalidationTopic) -> Self {
        Self {
            level,
            topics: InvalidationTopics::from_topic(topic),
        }
    }

    #[must_use]
    pub const fn level(self) -> InvalidationLevel {
        self.level
    }

    #[must_use]
    pub const fn topics(self) -> InvalidationTopics {
        self.topics
    }

    #[must_use]
    pub const fn has_topic(self, topic: InvalidationTopic) -> bool {
        self.topics.contains_topic(topic)
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self.level, InvalidationLevel::None)
    }

    pub fn merge(&mut self, other: Self) {
        self.level = self.level.max(other.level);
        self.topics = self.topics.union(other.topics);
    }

    /// Raises the level to at least `level` and adds `topic`.
    pub fn raise(&mut self, level: InvalidationLevel, topic: InvalidationTopic) {
        self.merge(Self::new(level, topic));
    }
}

/// Rendering summary returned by every protocol application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderDelta {
    pub mask: InvalidationMask,
    /// Indices of traces whose displayed state changed.
    #[serde(default)]
    pub traces: TraceIndices,
    /// Transition a renderer should interpolate over, when one was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionSpec>,
}

impl RenderDelta {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.mask.is_none()
    }

    pub fn merge(&mut self, other: Self) {
        self.mask.merge(other.mask);
        for index in other.traces {
            if !self.traces.contains(&index) {
                self.traces.push(index);
            }
        }
        if other.transition.is_some() {
            self.transition = other.transition;
        }
    }
}
