use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Axis, AxisId, AxisRef, DOMAIN_EPSILON, Domain};
use crate::error::{FigureError, FigureResult};
use crate::interaction::{Menu, Slider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f64,
    pub color: String,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Open Sans, verdana, arial, sans-serif".to_owned(),
            size: 12.0,
            color: "#444".to_owned(),
        }
    }
}

impl Font {
    pub fn validate(&self) -> FigureResult<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(FigureError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendOrientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Legend {
    #[serde(default)]
    pub orientation: LegendOrientation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    #[default]
    Group,
    Stack,
    Overlay,
    Relative,
}

/// Coordinate system an annotation position is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CoordRef {
    #[default]
    Paper,
    Axis(AxisId),
}

impl fmt::Display for CoordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paper => f.write_str("paper"),
            Self::Axis(id) => write!(f, "{id}"),
        }
    }
}

impl TryFrom<String> for CoordRef {
    type Error = FigureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "paper" {
            return Ok(Self::Paper);
        }
        value.parse().map(Self::Axis)
    }
}

impl From<CoordRef> for String {
    fn from(value: CoordRef) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub x_ref: CoordRef,
    #[serde(default)]
    pub y_ref: CoordRef,
    #[serde(default)]
    pub show_arrow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Annotation {
    /// Creates a paper-anchored annotation without an arrow.
    #[must_use]
    pub fn paper(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            x_ref: CoordRef::Paper,
            y_ref: CoordRef::Paper,
            show_arrow: false,
            font: None,
        }
    }
}

/// One rows×cols slot produced by grid composition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubplotCell {
    pub row: usize,
    pub col: usize,
    pub domain: Domain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes: Option<AxisRef>,
}

fn same_domain(a: Domain, b: Domain) -> bool {
    let close = |p: (f64, f64), q: (f64, f64)| {
        (p.0 - q.0).abs() <= DOMAIN_EPSILON && (p.1 - q.1).abs() <= DOMAIN_EPSILON
    };
    close(a.x, b.x) && close(a.y, b.y)
}

fn default_true() -> bool {
    true
}

/// Figure-wide presentation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub font: Font,
    #[serde(default)]
    pub legend: Legend,
    #[serde(default = "default_true")]
    pub show_legend: bool,
    #[serde(default)]
    pub axes: IndexMap<AxisId, Axis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<SubplotCell>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub menus: Vec<Menu>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sliders: Vec<Slider>,
    #[serde(default)]
    pub bar_mode: BarMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title: None,
            font: Font::default(),
            legend: Legend::default(),
            show_legend: true,
            axes: IndexMap::new(),
            cells: Vec::new(),
            annotations: Vec::new(),
            menus: Vec::new(),
            sliders: Vec::new(),
            bar_mode: BarMode::Group,
            width: None,
            height: None,
        }
    }
}

impl Layout {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axes.insert(axis.id, axis);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn with_menu(mut self, menu: Menu) -> Self {
        self.menus.push(menu);
        self
    }

    #[must_use]
    pub fn with_slider(mut self, slider: Slider) -> Self {
        self.sliders.push(slider);
        self
    }

    #[must_use]
    pub fn with_bar_mode(mut self, bar_mode: BarMode) -> Self {
        self.bar_mode = bar_mode;
        self
    }

    #[must_use]
    pub fn axis(&self, id: AxisId) -> Option<&Axis> {
        self.axes.get(&id)
    }

    #[must_use]
    pub fn has_axis(&self, id: AxisId) -> bool {
        self.axes.contains_key(&id)
    }

    pub fn resolve_axis_ref(&self, axis_ref: AxisRef) -> FigureResult<()> {
        for id in [axis_ref.x, axis_ref.y] {
            if !self.has_axis(id) {
                return Err(FigureError::AxisRefResolution(id.to_string()));
            }
        }
        Ok(())
    }

    /// Creates the axes of `axis_ref` with full domains when they are missing.
    pub(crate) fn ensure_axis_pair(&mut self, axis_ref: AxisRef) {
        if !self.has_axis(axis_ref.x) {
            self.axes
                .insert(axis_ref.x, Axis::new(axis_ref.x).anchored_to(axis_ref.y));
        }
        if !self.has_axis(axis_ref.y) {
            self.axes
                .insert(axis_ref.y, Axis::new(axis_ref.y).anchored_to(axis_ref.x));
        }
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&SubplotCell> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.col == col)
    }

    /// Cell whose axes are `axis_ref`.
    #[must_use]
    pub fn cell_for_axes(&self, axis_ref: AxisRef) -> Option<&SubplotCell> {
        self.cells.iter().find(|cell| cell.axes == Some(axis_ref))
    }

    /// Cell whose paper domain matches `domain` within `DOMAIN_EPSILON`.
    #[must_use]
    pub fn cell_at_domain(&self, domain: Domain) -> Option<&SubplotCell> {
        self.cells
            .iter()
            .find(|cell| same_domain(cell.domain, domain))
    }

    /// Axes of the cell at `domain`, giving an axis-less cell its own pair
    /// numbered after the highest axis index in use.
    ///
    /// Returns `None` when no cell sits at `domain`.
    pub(crate) fn cell_axes_at_domain(
        &mut self,
        domain: Domain,
    ) -> FigureResult<Option<AxisRef>> {
        let Some(position) = self
            .cells
            .iter()
            .position(|cell| same_domain(cell.domain, domain))
        else {
            return Ok(None);
        };
        if let Some(axes) = self.cells[position].axes {
            return Ok(Some(axes));
        }

        let index = self
            .axes
            .keys()
            .map(|id| id.index())
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| {
                FigureError::AxisRefResolution("no axis index left for a new cell".to_owned())
            })?;
        let axis_ref = AxisRef::new(AxisId::x(index), AxisId::y(index));
        let cell_domain = self.cells[position].domain;
        self.axes.insert(
            axis_ref.x,
            Axis::new(axis_ref.x)
                .with_domain(cell_domain.x.0, cell_domain.x.1)
                .anchored_to(axis_ref.y),
        );
        self.axes.insert(
            axis_ref.y,
            Axis::new(axis_ref.y)
                .with_domain(cell_domain.y.0, cell_domain.y.1)
                .anchored_to(axis_ref.x),
        );
        self.cells[position].axes = Some(axis_ref);
        Ok(Some(axis_ref))
    }

    /// Checks presentation invariants that do not depend on traces or frames.
    pub fn validate(&self) -> FigureResult<()> {
        self.font.validate()?;
        if self.width == Some(0) || self.height == Some(0) {
            return Err(FigureError::InvalidData(
                "layout width/height must be > 0 when set".to_owned(),
            ));
        }

        for (key, axis) in &self.axes {
            if *key != axis.id {
                return Err(FigureError::InvalidData(format!(
                    "axis stored under `{key}` declares id `{}`",
                    axis.id
                )));
            }
            axis.validate()?;
            for reference in [axis.anchor, axis.matches, axis.overlaying]
                .into_iter()
                .flatten()
            {
                if !self.has_axis(reference) {
                    return Err(FigureError::AxisRefResolution(reference.to_string()));
                }
            }
        }

        for (position, cell) in self.cells.iter().enumerate() {
            cell.domain.validate()?;
            if let Some(axes) = cell.axes {
                self.resolve_axis_ref(axes)?;
            }
            for other in &self.cells[position + 1..] {
                if cell.domain.overlaps(other.domain) {
                    return Err(FigureError::InvalidGrid(format!(
                        "cell ({}, {}) overlaps cell ({}, {})",
                        cell.row, cell.col, other.row, other.col
                    )));
                }
            }
        }

        for annotation in &self.annotations {
            for coord in [annotation.x_ref, annotation.y_ref] {
                if let CoordRef::Axis(id) = coord {
                    if !self.has_axis(id) {
                        return Err(FigureError::AxisRefResolution(id.to_string()));
                    }
                }
            }
            if !annotation.x.is_finite() || !annotation.y.is_finite() {
                return Err(FigureError::InvalidData(
                    "annotation position must be finite".to_owned(),
                ));
            }
            if let Some(font) = &annotation.font {
                font.validate()?;
            }
        }

        Ok(())
    }
}
