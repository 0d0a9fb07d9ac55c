use crate::extensions::{FigureEvent, ObserverContext};
use crate::render::Renderer;

use super::FigureSession;

impl<R: Renderer> FigureSession<R> {
    pub(super) fn observer_context(&self) -> ObserverContext {
        let traces = self.figure.traces();
        ObserverContext {
            generation: self.generation,
            trace_count: traces.len(),
            visible_count: traces
                .iter()
                .filter(|trace| trace.visible.is_plotted())
                .count(),
            frame_count: self.figure.frames().len(),
            playback: self.figure.playback().state().clone(),
        }
    }

    pub(super) fn emit_event(&mut self, event: FigureEvent) {
        if self.observers.is_empty() {
            return;
        }
        let context = self.observer_context();
        for observer in &mut self.observers {
            observer.on_event(&event, &context);
        }
    }

    pub(super) fn emit_playback_changed(&mut self) {
        let playback = self.figure.playback();
        let event = FigureEvent::PlaybackChanged {
            frame: playback.active_frame().map(ToOwned::to_owned),
            transitioning: playback.state().is_transitioning(),
        };
        self.emit_event(event);
    }
}
