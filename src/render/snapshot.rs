use serde::{Deserialize, Serialize};

use crate::core::{Figure, Layout, Trace};
use crate::error::{FigureError, FigureResult};
use crate::interaction::PlaybackState;

pub const FIGURE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Committed, displayed state of a figure handed to renderers and exporters.
///
/// Traces and layout already include the active frame overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSnapshot {
    pub generation: u64,
    pub traces: Vec<Trace>,
    pub layout: Layout,
    pub frame_names: Vec<String>,
    pub playback: PlaybackState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: FigureSnapshot,
}

impl FigureSnapshot {
    #[must_use]
    pub fn capture(figure: &Figure, generation: u64) -> Self {
        Self {
            generation,
            traces: figure.displayed_traces(),
            layout: figure.displayed_layout(),
            frame_names: figure.frames().names().map(ToOwned::to_owned).collect(),
            playback: figure.playback().state().clone(),
        }
    }

    /// Traces drawn in the plot area (`legendonly` traces are not).
    #[must_use]
    pub fn visible_trace_count(&self) -> usize {
        self.traces
            .iter()
            .filter(|trace| trace.visible.is_plotted())
            .count()
    }

    pub fn to_json_contract_v1_pretty(&self) -> FigureResult<String> {
        let payload = FigureSnapshotJsonContractV1 {
            schema_version: FIGURE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            FigureError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> FigureResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<FigureSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: FigureSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            FigureError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != FIGURE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(FigureError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
