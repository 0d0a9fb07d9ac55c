//! Stateful session facade: owns one figure, serializes instructions through
//! a bounded FIFO queue, tracks pending invalidation and drives a renderer.

mod controls_controller;
mod dispatch_controller;
mod invalidation;
mod json_contract;
mod observer_dispatch;
mod observer_registry;
mod playback_controller;
mod session_config;

pub use dispatch_controller::{CommitOutcome, InstructionSource};
pub use json_contract::{FIGURE_JSON_SCHEMA_V1, FigureJsonContractV1};
pub use session_config::SessionConfig;

use std::collections::VecDeque;

use tracing::debug;

use crate::core::Figure;
use crate::error::FigureResult;
use crate::extensions::FigureObserver;
use crate::protocol::InvalidationMask;
use crate::render::{FigureSnapshot, Renderer};

use dispatch_controller::QueuedInstruction;

/// Single writer for a figure.
///
/// Every mutation takes `&mut self`; concurrent callers are serialized
/// through `submit` + `process_pending`. Renderers and observers only ever
/// see committed state.
pub struct FigureSession<R: Renderer> {
    renderer: R,
    figure: Figure,
    config: SessionConfig,
    queue: VecDeque<QueuedInstruction>,
    pending: InvalidationMask,
    observers: Vec<Box<dyn FigureObserver>>,
    generation: u64,
}

impl<R: Renderer> FigureSession<R> {
    pub fn new(renderer: R, figure: Figure, config: SessionConfig) -> FigureResult<Self> {
        config.validate()?;
        debug!(
            traces = figure.trace_count(),
            frames = figure.frames().len(),
            max_queued = config.max_queued_instructions,
            "figure session created"
        );
        Ok(Self {
            renderer,
            figure,
            config,
            queue: VecDeque::with_capacity(config.max_queued_instructions),
            pending: InvalidationMask::full(),
            observers: Vec::new(),
            generation: 0,
        })
    }

    #[must_use]
    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Number of committed changes since the session was created.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Displayed state of the committed figure.
    #[must_use]
    pub fn snapshot(&self) -> FigureSnapshot {
        FigureSnapshot::capture(&self.figure, self.generation)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_figure(self) -> Figure {
        self.figure
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
