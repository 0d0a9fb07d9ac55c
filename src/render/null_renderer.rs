use crate::error::FigureResult;
use crate::render::{FigureSnapshot, Renderer};

/// No-op renderer used by tests and headless sessions.
///
/// It still validates the displayed layout so tests catch an inconsistent
/// snapshot before a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: usize,
    pub last_generation: u64,
    pub last_trace_count: usize,
    pub last_visible_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, snapshot: &FigureSnapshot) -> FigureResult<()> {
        snapshot.layout.validate()?;
        self.render_count += 1;
        self.last_generation = snapshot.generation;
        self.last_trace_count = snapshot.traces.len();
        self.last_visible_count = snapshot.visible_trace_count();
        Ok(())
    }
}
