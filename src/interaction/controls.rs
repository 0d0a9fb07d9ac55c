use serde::{Deserialize, Serialize};

use crate::core::{Figure, FrameRef, FrameSequence};
use crate::error::{FigureError, FigureResult};
use crate::protocol::{AnimateTarget, Instruction};

use super::TransitionSpec;

/// One selectable entry of a menu or slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlOption {
    pub label: String,
    pub instruction: Instruction,
}

impl ControlOption {
    #[must_use]
    pub fn new(label: impl Into<String>, instruction: Instruction) -> Self {
        Self {
            label: label.into(),
            instruction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    #[default]
    Dropdown,
    Buttons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuDirection {
    #[default]
    Down,
    Up,
    Left,
    Right,
}

fn default_true() -> bool {
    true
}

/// Dropdown or button row whose options fire protocol instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub kind: MenuKind,
    #[serde(default)]
    pub direction: MenuDirection,
    pub options: Vec<ControlOption>,
    /// Index of the last successfully applied option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<usize>,
    #[serde(default = "default_true")]
    pub show_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Menu {
    #[must_use]
    pub fn dropdown() -> Self {
        Self::with_kind(MenuKind::Dropdown)
    }

    #[must_use]
    pub fn buttons() -> Self {
        Self::with_kind(MenuKind::Buttons)
    }

    fn with_kind(kind: MenuKind) -> Self {
        Self {
            kind,
            direction: MenuDirection::Down,
            options: Vec::new(),
            active: None,
            show_active: true,
            x: None,
            y: None,
        }
    }

    /// Play/pause button pair driving frame playback.
    #[must_use]
    pub fn play_pause(transition: TransitionSpec) -> Self {
        Self::buttons()
            .with_direction(MenuDirection::Left)
            .with_option(
                "Play",
                Instruction::animate(AnimateTarget::All, transition.from_current(true)),
            )
            .with_option(
                "Pause",
                Instruction::animate(AnimateTarget::pause(), TransitionSpec::immediate()),
            )
    }

    #[must_use]
    pub fn with_option(mut self, label: impl Into<String>, instruction: Instruction) -> Self {
        self.options.push(ControlOption::new(label, instruction));
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: MenuDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: usize) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn option(&self, index: usize) -> FigureResult<&ControlOption> {
        self.options
            .get(index)
            .ok_or_else(|| FigureError::UnknownControl(format!("menu option {index}")))
    }

    pub(crate) fn validate_against(&self, figure: &Figure) -> FigureResult<()> {
        validate_options(&self.options, self.active, "menu", figure)
    }
}

/// Slider whose steps fire protocol instructions, usually frame seeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub steps: Vec<ControlOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value_prefix: Option<String>,
}

impl Slider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            active: None,
            current_value_prefix: None,
        }
    }

    /// One step per frame, each seeking its frame with `transition`.
    #[must_use]
    pub fn for_frames(frames: &FrameSequence, transition: TransitionSpec) -> Self {
        frames.names().fold(Self::new(), |slider, name| {
            slider.with_step(
                name,
                Instruction::animate(
                    AnimateTarget::Frame(FrameRef::Name(name.to_owned())),
                    transition,
                ),
            )
        })
    }

    #[must_use]
    pub fn with_step(mut self, label: impl Into<String>, instruction: Instruction) -> Self {
        self.steps.push(ControlOption::new(label, instruction));
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.current_value_prefix = Some(prefix.into());
        self
    }

    pub fn step(&self, index: usize) -> FigureResult<&ControlOption> {
        self.steps
            .get(index)
            .ok_or_else(|| FigureError::UnknownControl(format!("slider step {index}")))
    }

    pub(crate) fn validate_against(&self, figure: &Figure) -> FigureResult<()> {
        validate_options(&self.steps, self.active, "slider", figure)
    }
}

impl Default for Slider {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_options(
    options: &[ControlOption],
    active: Option<usize>,
    what: &str,
    figure: &Figure,
) -> FigureResult<()> {
    if let Some(active) = active {
        if active >= options.len() {
            return Err(FigureError::UnknownControl(format!(
                "{what} active index {active} with {} options",
                options.len()
            )));
        }
    }
    for option in options {
        option.instruction.validate_binding(figure)?;
    }
    Ok(())
}
