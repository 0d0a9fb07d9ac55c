mod null_renderer;
mod snapshot;

pub use null_renderer::NullRenderer;
pub use snapshot::{FIGURE_SNAPSHOT_JSON_SCHEMA_V1, FigureSnapshot, FigureSnapshotJsonContractV1};

use crate::error::FigureResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, committed `FigureSnapshot` so
/// drawing code stays isolated from the update protocol and playback logic.
pub trait Renderer {
    fn render(&mut self, snapshot: &FigureSnapshot) -> FigureResult<()>;
}
