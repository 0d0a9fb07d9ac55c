use serde::{Deserialize, Serialize};

use crate::error::{FigureError, FigureResult};
use crate::interaction::TransitionSpec;

fn default_max_queued_instructions() -> usize {
    64
}

/// Session bootstrap configuration.
///
/// Serializable so host applications can persist session setup next to the
/// figure JSON contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Upper bound of instructions waiting in the FIFO queue.
    #[serde(default = "default_max_queued_instructions")]
    pub max_queued_instructions: usize,
    /// Render right after each successful commit instead of waiting for
    /// `render_if_invalidated`.
    #[serde(default)]
    pub render_on_commit: bool,
    /// Transition used by `animate_to`, `play` and `pause`.
    #[serde(default)]
    pub default_transition: TransitionSpec,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_queued_instructions: default_max_queued_instructions(),
            render_on_commit: false,
            default_transition: TransitionSpec::default(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_queued_instructions(mut self, max_queued_instructions: usize) -> Self {
        self.max_queued_instructions = max_queued_instructions;
        self
    }

    #[must_use]
    pub fn with_render_on_commit(mut self, render_on_commit: bool) -> Self {
        self.render_on_commit = render_on_commit;
        self
    }

    #[must_use]
    pub fn with_default_transition(mut self, transition: TransitionSpec) -> Self {
        self.default_transition = transition;
        self
    }

    pub fn validate(self) -> FigureResult<()> {
        if self.max_queued_instructions == 0 {
            return Err(FigureError::InvalidData(
                "max_queued_instructions must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> FigureResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            FigureError::InvalidData(format!("failed to parse session config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(self) -> FigureResult<String> {
        serde_json::to_string_pretty(&self).map_err(|e| {
            FigureError::InvalidData(format!("failed to serialize session config json: {e}"))
        })
    }
}
