use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Datum, Trace};
use crate::error::{FigureError, FigureResult};

use super::{Cell, GridComposer, GridComposition, GridSpec, SharedAxes};

/// Hashable category value used to group facet records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetKey {
    Missing,
    Number(OrderedFloat<f64>),
    Text(String),
}

impl fmt::Display for FacetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Number(value) => write!(f, "{}", value.0),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&Datum> for FacetKey {
    fn from(value: &Datum) -> Self {
        match value {
            Datum::Missing => Self::Missing,
            Datum::Number(number) => Self::Number(OrderedFloat(*number)),
            Datum::Time(time) => Self::Text(time.to_rfc3339()),
            Datum::Text(text) => Self::Text(text.clone()),
        }
    }
}

impl From<Datum> for FacetKey {
    fn from(value: Datum) -> Self {
        Self::from(&value)
    }
}

impl From<&str> for FacetKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FacetKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FacetKey {
    fn from(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }
}

/// Direction in which facet replicas fill the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetDirection {
    /// Left to right, wrapping into a new row after `wrap` columns.
    #[default]
    Columns,
    /// Top to bottom, wrapping into a new column after `wrap` rows.
    Rows,
}

fn default_share() -> bool {
    true
}

/// Per-category replication of one trace rule across grid cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetSpec {
    /// Prefix of each cell title, rendered as `"<label>=<value>"`.
    pub label: String,
    #[serde(default)]
    pub direction: FacetDirection,
    /// Maximum replicas along `direction` before wrapping; unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<usize>,
    #[serde(default = "default_share")]
    pub share_x: bool,
    #[serde(default = "default_share")]
    pub share_y: bool,
    #[serde(default)]
    pub spacing: f64,
    #[serde(default = "default_share")]
    pub show_titles: bool,
}

impl FacetSpec {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            direction: FacetDirection::Columns,
            wrap: None,
            share_x: true,
            share_y: true,
            spacing: 0.0,
            show_titles: true,
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: FacetDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_wrap(mut self, wrap: usize) -> Self {
        self.wrap = Some(wrap);
        self
    }

    #[must_use]
    pub fn with_shared_axes(mut self, share_x: bool, share_y: bool) -> Self {
        self.share_x = share_x;
        self.share_y = share_y;
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_titles(mut self, show_titles: bool) -> Self {
        self.show_titles = show_titles;
        self
    }

    /// Grid shape `(rows, cols)` for `count` replicas.
    fn shape(&self, count: usize) -> FigureResult<(usize, usize)> {
        let along = match self.wrap {
            Some(0) => {
                return Err(FigureError::InvalidGrid(
                    "facet wrap must be at least 1".to_owned(),
                ));
            }
            Some(wrap) => wrap.min(count),
            None => count,
        };
        let across = count.div_ceil(along);
        Ok(match self.direction {
            FacetDirection::Columns => (across, along),
            FacetDirection::Rows => (along, across),
        })
    }

    /// Cell of the `ordinal`-th replica (0-based) in a `rows × cols` grid.
    fn cell(&self, ordinal: usize, rows: usize, cols: usize) -> Cell {
        match self.direction {
            FacetDirection::Columns => Cell::new(ordinal / cols + 1, ordinal % cols + 1),
            FacetDirection::Rows => Cell::new(ordinal % rows + 1, ordinal / rows + 1),
        }
    }

    /// Groups `records` by `category` in first-appearance order and builds one
    /// trace per group with `rule`, each placed in its own cell.
    pub fn compose<R, K, C, F>(
        &self,
        records: &[R],
        category: C,
        mut rule: F,
    ) -> FigureResult<GridComposition>
    where
        K: Into<FacetKey>,
        C: Fn(&R) -> K,
        F: FnMut(&FacetKey, &[&R]) -> FigureResult<Trace>,
    {
        if records.is_empty() {
            return Err(FigureError::InvalidGrid(
                "facet composition needs at least one record".to_owned(),
            ));
        }

        let mut groups: IndexMap<FacetKey, Vec<&R>> = IndexMap::new();
        for record in records {
            groups.entry(category(record).into()).or_default().push(record);
        }

        let (rows, cols) = self.shape(groups.len())?;
        let shared = |share: bool| {
            if share {
                SharedAxes::All
            } else {
                SharedAxes::None
            }
        };
        let mut grid = GridSpec::new(rows, cols)
            .with_spacing(self.spacing, self.spacing)
            .with_shared_x(shared(self.share_x))
            .with_shared_y(shared(self.share_y));
        if self.show_titles {
            let mut titles = vec![String::new(); rows * cols];
            for (ordinal, key) in groups.keys().enumerate() {
                let cell = self.cell(ordinal, rows, cols);
                titles[(cell.row - 1) * cols + (cell.col - 1)] = format!("{}={key}", self.label);
            }
            grid = grid.with_subplot_titles(titles);
        }

        let mut composer = GridComposer::new(grid)?;
        for (ordinal, (key, members)) in groups.iter().enumerate() {
            let trace = rule(key, members)?;
            composer = composer.place(trace, self.cell(ordinal, rows, cols));
        }
        debug!(
            label = %self.label,
            categories = groups.len(),
            rows,
            cols,
            "facet grid composed"
        );
        composer.compose()
    }
}

#[cfg(test)]
mod tests {
    use super::{FacetDirection, FacetKey, FacetSpec};
    use crate::core::Datum;

    #[test]
    fn shape_wraps_along_direction() {
        let spec = FacetSpec::new("g").with_wrap(2);
        assert_eq!(spec.shape(3).expect("shape"), (2, 2));
        let spec = spec.with_direction(FacetDirection::Rows);
        assert_eq!(spec.shape(3).expect("shape"), (2, 2));
        assert_eq!(spec.cell(2, 2, 2).row, 1);
        assert_eq!(spec.cell(2, 2, 2).col, 2);
        assert!(FacetSpec::new("g").with_wrap(0).shape(3).is_err());
    }

    #[test]
    fn keys_render_without_decoration() {
        assert_eq!(FacetKey::from(&Datum::Number(2.5)).to_string(), "2.5");
        assert_eq!(FacetKey::from("west").to_string(), "west");
        assert_eq!(FacetKey::Missing.to_string(), "");
    }
}
