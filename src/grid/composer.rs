use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    Annotation, Axis, AxisDim, AxisId, AxisRef, Domain, Figure, FigureBuilder, Layout,
    SubplotCell, Trace,
};
use crate::error::{FigureError, FigureResult};

/// 1-based grid slot; row 1 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Which cells share one axis of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharedAxes {
    #[default]
    None,
    Columns,
    Rows,
    All,
}

/// Shape and spacing of a subplot grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_widths: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_heights: Option<Vec<f64>>,
    #[serde(default)]
    pub horizontal_spacing: f64,
    #[serde(default)]
    pub vertical_spacing: f64,
    #[serde(default)]
    pub shared_x: SharedAxes,
    #[serde(default)]
    pub shared_y: SharedAxes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subplot_titles: Vec<String>,
}

impl GridSpec {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            column_widths: None,
            row_heights: None,
            horizontal_spacing: 0.0,
            vertical_spacing: 0.0,
            shared_x: SharedAxes::None,
            shared_y: SharedAxes::None,
            subplot_titles: Vec::new(),
        }
    }

    /// Relative column weights; normalized at composition time.
    #[must_use]
    pub fn with_column_widths(mut self, widths: Vec<f64>) -> Self {
        self.column_widths = Some(widths);
        self
    }

    /// Relative row weights, top row first; normalized at composition time.
    #[must_use]
    pub fn with_row_heights(mut self, heights: Vec<f64>) -> Self {
        self.row_heights = Some(heights);
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_spacing = horizontal;
        self.vertical_spacing = vertical;
        self
    }

    #[must_use]
    pub fn with_shared_x(mut self, shared: SharedAxes) -> Self {
        self.shared_x = shared;
        self
    }

    #[must_use]
    pub fn with_shared_y(mut self, shared: SharedAxes) -> Self {
        self.shared_y = shared;
        self
    }

    #[must_use]
    pub fn with_subplot_titles<S: Into<String>>(
        mut self,
        titles: impl IntoIterator<Item = S>,
    ) -> Self {
        self.subplot_titles = titles.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn validate(&self) -> FigureResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(FigureError::InvalidGrid(format!(
                "grid must have at least one row and column, got {}x{}",
                self.rows, self.cols
            )));
        }
        // Axis ids are u16 and the allocator advances past the last cell.
        if self.cell_count() >= usize::from(u16::MAX) {
            return Err(FigureError::InvalidGrid(format!(
                "grid of {}x{} cells exceeds the axis id space",
                self.rows, self.cols
            )));
        }
        validate_weights(self.column_widths.as_deref(), self.cols, "column_widths")?;
        validate_weights(self.row_heights.as_deref(), self.rows, "row_heights")?;
        validate_spacing(self.horizontal_spacing, self.cols, "horizontal_spacing")?;
        validate_spacing(self.vertical_spacing, self.rows, "vertical_spacing")?;
        if self.subplot_titles.len() > self.cell_count() {
            return Err(FigureError::InvalidGrid(format!(
                "{} subplot titles for {} cells",
                self.subplot_titles.len(),
                self.cell_count()
            )));
        }
        Ok(())
    }
}

fn validate_weights(weights: Option<&[f64]>, expected: usize, what: &str) -> FigureResult<()> {
    let Some(weights) = weights else {
        return Ok(());
    };
    if weights.len() != expected {
        return Err(FigureError::InvalidGrid(format!(
            "{what} needs {expected} entries, got {}",
            weights.len()
        )));
    }
    if weights
        .iter()
        .any(|weight| !weight.is_finite() || *weight <= 0.0)
    {
        return Err(FigureError::InvalidGrid(format!(
            "{what} entries must be finite and > 0"
        )));
    }
    Ok(())
}

fn validate_spacing(spacing: f64, count: usize, what: &str) -> FigureResult<()> {
    if !spacing.is_finite() || !(0.0..1.0).contains(&spacing) {
        return Err(FigureError::InvalidGrid(format!(
            "{what} must be within [0, 1), got {spacing}"
        )));
    }
    if spacing * count.saturating_sub(1) as f64 >= 1.0 {
        return Err(FigureError::InvalidGrid(format!(
            "{what} of {spacing} leaves no room for {count} cells"
        )));
    }
    Ok(())
}

/// Splits `[0, 1]` into `count` consecutive spans separated by `spacing`.
///
/// Neighbouring spans share the exact boundary value when `spacing` is zero
/// and the last span always ends at `1.0`.
fn partition(weights: Option<&[f64]>, count: usize, spacing: f64) -> Vec<(f64, f64)> {
    let usable = 1.0 - spacing * count.saturating_sub(1) as f64;
    let mut normalized: Vec<f64> = match weights {
        Some(weights) => weights.to_vec(),
        None => vec![1.0; count],
    };
    let weight_sum: f64 = normalized.iter().sum();
    for weight in &mut normalized {
        *weight /= weight_sum;
    }

    let mut spans = Vec::with_capacity(count);
    let mut cursor = 0.0;
    let last_index = count.saturating_sub(1);
    for (index, weight) in normalized.iter().enumerate() {
        let end = if index == last_index {
            1.0
        } else {
            (cursor + usable * weight).clamp(cursor, 1.0)
        };
        spans.push((cursor, end));
        cursor = (end + spacing).min(1.0);
    }
    spans
}

/// Result of grid composition: a layout plus traces bound to its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct GridComposition {
    pub layout: Layout,
    pub traces: Vec<Trace>,
}

impl GridComposition {
    #[must_use]
    pub fn into_builder(self) -> FigureBuilder {
        FigureBuilder::new().layout(self.layout).traces(self.traces)
    }

    pub fn build(self) -> FigureResult<Figure> {
        self.into_builder().build()
    }
}

/// Places traces into a rows×cols arrangement of subplots.
///
/// Cells evenly (or weight-proportionally) partition the canvas without
/// overlap. Each placed trace is bound to its cell: xy kinds through
/// `axis_ref`, axis-less kinds through their paper `domain`.
#[derive(Debug, Clone)]
pub struct GridComposer {
    spec: GridSpec,
    layout: Layout,
    placements: Vec<(Trace, Cell)>,
}

impl GridComposer {
    pub fn new(spec: GridSpec) -> FigureResult<Self> {
        spec.validate()?;
        Ok(Self {
            spec,
            layout: Layout::default(),
            placements: Vec::new(),
        })
    }

    #[must_use]
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Base layout (title, font, controls) the composed grid is merged into.
    /// Its axes and cells are replaced by the composed ones.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Places `trace` in cell (1, 1).
    #[must_use]
    pub fn add(self, trace: Trace) -> Self {
        self.place(trace, Cell::default())
    }

    #[must_use]
    pub fn place(mut self, trace: Trace, cell: Cell) -> Self {
        self.placements.push((trace, cell));
        self
    }

    pub fn compose(self) -> FigureResult<GridComposition> {
        let Self {
            spec,
            mut layout,
            placements,
        } = self;

        for (_, cell) in &placements {
            if !(1..=spec.rows).contains(&cell.row) || !(1..=spec.cols).contains(&cell.col) {
                return Err(FigureError::InvalidGrid(format!(
                    "cell ({}, {}) is outside a {}x{} grid",
                    cell.row, cell.col, spec.rows, spec.cols
                )));
            }
        }

        let col_spans = partition(
            spec.column_widths.as_deref(),
            spec.cols,
            spec.horizontal_spacing,
        );
        let row_spans = partition(spec.row_heights.as_deref(), spec.rows, spec.vertical_spacing);

        let mut axes = IndexMap::new();
        let mut cells = Vec::with_capacity(spec.cell_count());
        let mut next_axis: u16 = 1;
        for row in 1..=spec.rows {
            for col in 1..=spec.cols {
                let (top, bottom) = row_spans[row - 1];
                let domain = Domain {
                    x: col_spans[col - 1],
                    y: (1.0 - bottom, 1.0 - top),
                };
                let mut placed = placements
                    .iter()
                    .filter(|(_, cell)| cell.row == row && cell.col == col)
                    .map(|(trace, _)| trace)
                    .peekable();
                let needs_axes =
                    placed.peek().is_none() || placed.any(|trace| !trace.is_axis_less());
                let cell_axes = needs_axes.then(|| {
                    let axis_ref = AxisRef::new(AxisId::x(next_axis), AxisId::y(next_axis));
                    next_axis += 1;
                    axes.insert(
                        axis_ref.x,
                        Axis::new(axis_ref.x)
                            .with_domain(domain.x.0, domain.x.1)
                            .anchored_to(axis_ref.y),
                    );
                    axes.insert(
                        axis_ref.y,
                        Axis::new(axis_ref.y)
                            .with_domain(domain.y.0, domain.y.1)
                            .anchored_to(axis_ref.x),
                    );
                    axis_ref
                });
                cells.push(SubplotCell {
                    row,
                    col,
                    domain,
                    axes: cell_axes,
                });
            }
        }

        share_axes(&mut axes, &cells, AxisDim::X, spec.shared_x);
        share_axes(&mut axes, &cells, AxisDim::Y, spec.shared_y);

        for (title, cell) in spec.subplot_titles.iter().zip(&cells) {
            if title.is_empty() {
                continue;
            }
            let (x, y) = cell.domain.top_center();
            layout.annotations.push(Annotation::paper(title.clone(), x, y));
        }

        let traces: Vec<Trace> = placements
            .into_iter()
            .map(|(mut trace, cell)| {
                let slot = &cells[(cell.row - 1) * spec.cols + (cell.col - 1)];
                if trace.is_axis_less() {
                    trace.axis_ref = None;
                    trace.domain = Some(slot.domain);
                } else {
                    trace.axis_ref = slot.axes;
                }
                trace
            })
            .collect();

        debug!(
            rows = spec.rows,
            cols = spec.cols,
            traces = traces.len(),
            axes = axes.len(),
            "grid composed"
        );
        layout.axes = axes;
        layout.cells = cells;
        Ok(GridComposition { layout, traces })
    }
}

fn share_axes(
    axes: &mut IndexMap<AxisId, Axis>,
    cells: &[SubplotCell],
    dim: AxisDim,
    mode: SharedAxes,
) {
    let group_of = |cell: &SubplotCell| match mode {
        SharedAxes::None => None,
        SharedAxes::Columns => Some(cell.col),
        SharedAxes::Rows => Some(cell.row),
        SharedAxes::All => Some(0),
    };
    let members: Vec<(&SubplotCell, AxisId)> = cells
        .iter()
        .filter_map(|cell| {
            let axis_ref = cell.axes?;
            let id = match dim {
                AxisDim::X => axis_ref.x,
                AxisDim::Y => axis_ref.y,
            };
            Some((cell, id))
        })
        .collect();

    for (cell, id) in &members {
        let Some(group) = group_of(cell) else {
            return;
        };
        let in_group = || {
            members
                .iter()
                .filter(move |(other, _)| group_of(other) == Some(group))
        };
        let reference = in_group().map(|(_, other_id)| *other_id).next();
        // Inner cells hide tick labels: x labels stay on the lowest cell of a
        // column, y labels on the leftmost cell of a row.
        let covered = in_group().any(|(other, _)| match dim {
            AxisDim::X => other.col == cell.col && other.row > cell.row,
            AxisDim::Y => other.row == cell.row && other.col < cell.col,
        });
        if let Some(axis) = axes.get_mut(id) {
            if reference != Some(*id) {
                axis.matches = reference;
            }
            if covered {
                axis.show_tick_labels = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GridSpec, partition};

    #[test]
    fn partition_covers_unit_interval_without_gaps() {
        let spans = partition(None, 3, 0.0);
        assert_eq!(spans[0].0, 0.0);
        assert_eq!(spans[0].1, spans[1].0);
        assert_eq!(spans[1].1, spans[2].0);
        assert_eq!(spans[2].1, 1.0);
    }

    #[test]
    fn partition_respects_weights_and_spacing() {
        let spans = partition(Some(&[3.0, 1.0]), 2, 0.2);
        assert!((spans[0].1 - 0.6).abs() <= 1e-12);
        assert!((spans[1].0 - 0.8).abs() <= 1e-12);
        assert_eq!(spans[1].1, 1.0);
    }

    #[test]
    fn spec_rejects_bad_shapes() {
        assert!(GridSpec::new(0, 2).validate().is_err());
        assert!(GridSpec::new(1, usize::from(u16::MAX)).validate().is_err());
        assert!(GridSpec::new(1, usize::from(u16::MAX) - 1).validate().is_ok());
        assert!(GridSpec::new(1, 2).with_column_widths(vec![1.0]).validate().is_err());
        assert!(GridSpec::new(1, 2).with_spacing(1.0, 0.0).validate().is_err());
        assert!(
            GridSpec::new(1, 1)
                .with_subplot_titles(["a", "b"])
                .validate()
                .is_err()
        );
    }
}
