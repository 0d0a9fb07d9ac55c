use serde::{Deserialize, Serialize};

use crate::core::Figure;
use crate::error::{FigureError, FigureResult};
use crate::render::Renderer;

use super::FigureSession;

pub const FIGURE_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureJsonContractV1 {
    pub schema_version: u32,
    pub figure: Figure,
}

impl Figure {
    pub fn to_json_contract_v1_pretty(&self) -> FigureResult<String> {
        let payload = FigureJsonContractV1 {
            schema_version: FIGURE_JSON_SCHEMA_V1,
            figure: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            FigureError::InvalidData(format!("failed to serialize figure contract v1: {e}"))
        })
    }

    /// Parses a figure from either a v1 contract or a bare figure payload.
    ///
    /// Both forms are validated; a payload that breaks a figure invariant is
    /// rejected with `InvalidData`.
    pub fn from_json_compat_str(input: &str) -> FigureResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            FigureError::InvalidData(format!("failed to parse figure json payload: {e}"))
        })?;
        if value.get("schema_version").is_none() {
            return serde_json::from_value(value).map_err(|e| {
                FigureError::InvalidData(format!("invalid figure json payload: {e}"))
            });
        }
        let payload: FigureJsonContractV1 = serde_json::from_value(value).map_err(|e| {
            FigureError::InvalidData(format!("invalid figure contract payload: {e}"))
        })?;
        if payload.schema_version != FIGURE_JSON_SCHEMA_V1 {
            return Err(FigureError::InvalidData(format!(
                "unsupported figure schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.figure)
    }
}

impl<R: Renderer> FigureSession<R> {
    pub fn figure_json_contract_v1_pretty(&self) -> FigureResult<String> {
        self.figure.to_json_contract_v1_pretty()
    }

    pub fn snapshot_json_contract_v1_pretty(&self) -> FigureResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}
