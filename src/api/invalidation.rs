use tracing::trace;

use crate::error::FigureResult;
use crate::extensions::FigureEvent;
use crate::protocol::{InvalidationLevel, InvalidationMask, InvalidationTopic};
use crate::render::Renderer;

use super::FigureSession;

impl<R: Renderer> FigureSession<R> {
    /// Union of every delta committed since the last successful render.
    #[must_use]
    pub fn pending_invalidation(&self) -> InvalidationMask {
        self.pending
    }

    #[must_use]
    pub fn pending_invalidation_level(&self) -> InvalidationLevel {
        self.pending.level()
    }

    #[must_use]
    pub fn has_pending_invalidation(&self) -> bool {
        !self.pending.is_none()
    }

    #[must_use]
    pub fn has_pending_invalidation_topic(&self, topic: InvalidationTopic) -> bool {
        self.pending.has_topic(topic)
    }

    pub fn clear_pending_invalidation(&mut self) {
        self.pending = InvalidationMask::none();
    }

    /// Hands the committed displayed state to the renderer.
    pub fn render(&mut self) -> FigureResult<()> {
        let snapshot = self.snapshot();
        self.renderer.render(&snapshot)?;
        trace!(
            generation = self.generation,
            level = ?self.pending.level(),
            "figure rendered"
        );
        self.clear_pending_invalidation();
        self.emit_event(FigureEvent::Rendered {
            generation: self.generation,
        });
        Ok(())
    }

    /// Renders only when something changed since the last render.
    pub fn render_if_invalidated(&mut self) -> FigureResult<bool> {
        if !self.has_pending_invalidation() {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{FigureSession, SessionConfig};
    use crate::core::{Figure, Trace, TraceKind, Visibility};
    use crate::protocol::{Instruction, InvalidationLevel, InvalidationTopic, TracePatch};
    use crate::render::NullRenderer;

    fn build_session() -> FigureSession<NullRenderer> {
        let figure = Figure::builder()
            .trace(Trace::xy(TraceKind::Line, [1.0, 2.0], [3.0, 4.0]).expect("line"))
            .build()
            .expect("figure");
        FigureSession::new(NullRenderer::default(), figure, SessionConfig::default())
            .expect("session")
    }

    #[test]
    fn new_session_starts_fully_invalidated() {
        let session = build_session();
        assert_eq!(session.pending_invalidation_level(), InvalidationLevel::Full);
    }

    #[test]
    fn gate_render_returns_false_without_pending_invalidation() {
        let mut session = build_session();
        session.clear_pending_invalidation();
        let rendered = session.render_if_invalidated().expect("gate render");
        assert!(!rendered);
        assert_eq!(session.renderer().render_count, 0);
    }

    #[test]
    fn commit_marks_topics_until_rendered() {
        let mut session = build_session();
        session.render().expect("initial render");
        session
            .dispatch(&Instruction::restyle(
                TracePatch::new().with_visible(Visibility::Hidden),
            ))
            .expect("restyle");
        assert!(session.has_pending_invalidation_topic(InvalidationTopic::Traces));
        assert!(session.render_if_invalidated().expect("render"));
        assert!(!session.has_pending_invalidation());
        assert_eq!(session.renderer().last_visible_count, 0);
    }
}
