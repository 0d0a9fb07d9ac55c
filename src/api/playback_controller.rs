use tracing::trace;

use crate::core::FrameRef;
use crate::error::FigureResult;
use crate::interaction::PlaybackState;
use crate::protocol::{AnimateTarget, Instruction, RenderDelta};
use crate::render::Renderer;

use super::FigureSession;

impl<R: Renderer> FigureSession<R> {
    /// Advances the animation clock by `delta_ms` of renderer time.
    pub fn tick(&mut self, delta_ms: u64) -> RenderDelta {
        let delta = self.figure.advance_playback(delta_ms);
        trace!(
            delta_ms,
            changed = !delta.is_none(),
            frame = ?self.figure.playback().active_frame(),
            "playback tick"
        );
        if !delta.is_none() {
            self.record_delta(&delta);
            self.emit_playback_changed();
            self.render_after_commit(&delta);
        }
        delta
    }

    /// Animates to one frame with the session's default transition.
    pub fn animate_to(&mut self, frame: impl Into<FrameRef>) -> FigureResult<RenderDelta> {
        let instruction = Instruction::animate(
            AnimateTarget::frame(frame),
            self.config.default_transition,
        );
        self.dispatch(&instruction)
    }

    /// Plays every frame in order, resuming after the one currently shown.
    pub fn play(&mut self) -> FigureResult<RenderDelta> {
        let instruction = Instruction::animate(
            AnimateTarget::All,
            self.config.default_transition.from_current(true),
        );
        self.dispatch(&instruction)
    }

    /// Stops the playlist and lands on the frame being approached.
    pub fn pause(&mut self) -> FigureResult<RenderDelta> {
        let instruction =
            Instruction::animate(AnimateTarget::pause(), self.config.default_transition);
        self.dispatch(&instruction)
    }

    #[must_use]
    pub fn playback_state(&self) -> &PlaybackState {
        self.figure.playback().state()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.figure.playback().is_playing()
    }
}
