use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::validate_span;
use crate::error::{FigureError, FigureResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisDim {
    X,
    Y,
}

impl AxisDim {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }

    #[must_use]
    pub const fn orthogonal(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Axis identifier in the conventional `x`, `x2`, `y`, `y3` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AxisId {
    dim: AxisDim,
    index: u16,
}

impl AxisId {
    /// Creates an x axis id; `index` is clamped to at least 1.
    #[must_use]
    pub const fn x(index: u16) -> Self {
        Self {
            dim: AxisDim::X,
            index: if index == 0 { 1 } else { index },
        }
    }

    /// Creates a y axis id; `index` is clamped to at least 1.
    #[must_use]
    pub const fn y(index: u16) -> Self {
        Self {
            dim: AxisDim::Y,
            index: if index == 0 { 1 } else { index },
        }
    }

    #[must_use]
    pub const fn dim(self) -> AxisDim {
        self.dim
    }

    #[must_use]
    pub const fn index(self) -> u16 {
        self.index
    }

    /// Layout attribute name (`xaxis`, `yaxis2`).
    #[must_use]
    pub fn layout_key(self) -> String {
        if self.index == 1 {
            format!("{}axis", self.dim.prefix())
        } else {
            format!("{}axis{}", self.dim.prefix(), self.index)
        }
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index == 1 {
            f.write_str(self.dim.prefix())
        } else {
            write!(f, "{}{}", self.dim.prefix(), self.index)
        }
    }
}

impl FromStr for AxisId {
    type Err = FigureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FigureError::InvalidData(format!("invalid axis id `{s}`"));
        let mut chars = s.chars();
        let dim = match chars.next() {
            Some('x') => AxisDim::X,
            Some('y') => AxisDim::Y,
            _ => return Err(invalid()),
        };
        let rest = chars.as_str();
        let index = if rest.is_empty() {
            1
        } else {
            let index: u16 = rest.parse().map_err(|_| invalid())?;
            // `x1` is spelled `x`.
            if index < 2 {
                return Err(invalid());
            }
            index
        };
        Ok(Self { dim, index })
    }
}

impl TryFrom<String> for AxisId {
    type Error = FigureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AxisId> for String {
    fn from(value: AxisId) -> Self {
        value.to_string()
    }
}

/// Binding of a trace to one x axis and one y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisRef {
    pub x: AxisId,
    pub y: AxisId,
}

impl AxisRef {
    #[must_use]
    pub const fn new(x: AxisId, y: AxisId) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn primary() -> Self {
        Self {
            x: AxisId::x(1),
            y: AxisId::y(1),
        }
    }
}

impl Default for AxisRef {
    fn default() -> Self {
        Self::primary()
    }
}

impl fmt::Display for AxisRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisRange {
    #[default]
    Auto,
    Fixed(f64, f64),
}

impl AxisRange {
    pub fn validate(self) -> FigureResult<()> {
        if let Self::Fixed(start, end) = self {
            if !start.is_finite() || !end.is_finite() || start == end {
                return Err(FigureError::InvalidData(
                    "axis range must be finite and non-empty".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    #[default]
    Linear,
    Log,
    Date,
    Category,
}

fn default_span() -> (f64, f64) {
    (0.0, 1.0)
}

fn default_true() -> bool {
    true
}

/// One coordinate axis of the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub id: AxisId,
    #[serde(default = "default_span")]
    pub domain: (f64, f64),
    #[serde(default)]
    pub range: AxisRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AxisId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<AxisId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<AxisId>,
    #[serde(default = "default_true")]
    pub show_tick_labels: bool,
    #[serde(default)]
    pub axis_type: AxisType,
}

impl Axis {
    #[must_use]
    pub fn new(id: AxisId) -> Self {
        Self {
            id,
            domain: default_span(),
            range: AxisRange::Auto,
            title: None,
            anchor: None,
            matches: None,
            overlaying: None,
            show_tick_labels: true,
            axis_type: AxisType::Linear,
        }
    }

    #[must_use]
    pub fn with_domain(mut self, start: f64, end: f64) -> Self {
        self.domain = (start, end);
        self
    }

    #[must_use]
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.range = AxisRange::Fixed(start, end);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn anchored_to(mut self, anchor: AxisId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    #[must_use]
    pub fn matching(mut self, other: AxisId) -> Self {
        self.matches = Some(other);
        self
    }

    #[must_use]
    pub fn overlaying(mut self, other: AxisId) -> Self {
        self.overlaying = Some(other);
        self
    }

    /// Checks axis-local invariants; references are resolved by `Layout`.
    pub fn validate(&self) -> FigureResult<()> {
        validate_span(self.domain, &format!("{} domain", self.id.layout_key()))?;
        self.range.validate()?;
        if let Some(anchor) = self.anchor {
            if anchor.dim() != self.id.dim().orthogonal() {
                return Err(FigureError::InvalidData(format!(
                    "{} must anchor to a {} axis, got `{anchor}`",
                    self.id.layout_key(),
                    self.id.dim().orthogonal().prefix()
                )));
            }
        }
        for (what, target) in [("matches", self.matches), ("overlaying", self.overlaying)] {
            if let Some(target) = target {
                if target.dim() != self.id.dim() || target == self.id {
                    return Err(FigureError::InvalidData(format!(
                        "{} `{what}` must name another {} axis, got `{target}`",
                        self.id.layout_key(),
                        self.id.dim().prefix()
                    )));
                }
            }
        }
        Ok(())
    }
}
