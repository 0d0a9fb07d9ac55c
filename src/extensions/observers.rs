use serde::{Deserialize, Serialize};

use crate::interaction::PlaybackState;
use crate::protocol::{InvalidationLevel, TraceIndices};

/// Read-only summary of the committed figure passed to observer hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverContext {
    pub generation: u64,
    pub trace_count: usize,
    pub visible_count: usize,
    pub frame_count: usize,
    pub playback: PlaybackState,
}

/// Event stream exposed to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FigureEvent {
    InstructionCommitted {
        method: String,
        level: InvalidationLevel,
        traces: TraceIndices,
    },
    InstructionRejected {
        method: String,
        reason: String,
    },
    ControlActivated {
        control: String,
        index: usize,
    },
    PlaybackChanged {
        frame: Option<String>,
        transitioning: bool,
    },
    Rendered {
        generation: u64,
    },
}

/// Hook interface for code that reacts to figure changes.
///
/// Observers see events and a context summary after each commit; they never
/// get mutable access to the figure.
pub trait FigureObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &FigureEvent, context: &ObserverContext);
}
