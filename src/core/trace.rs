use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{AxisRef, Datum, Domain};
use crate::error::{FigureError, FigureResult};

/// Chart-type discriminator carried by every trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Bar,
    Line,
    Scatter,
    Area,
    Box,
    Histogram,
    Pie,
    Table,
}

impl TraceKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Area => "area",
            Self::Box => "box",
            Self::Histogram => "histogram",
            Self::Pie => "pie",
            Self::Table => "table",
        }
    }

    /// Axis-less kinds are placed by paper domain and never bind to x/y axes.
    #[must_use]
    pub const fn is_axis_less(self) -> bool {
        matches!(self, Self::Pie | Self::Table)
    }

    #[must_use]
    pub fn accepts(self, payload: &TracePayload) -> bool {
        match self {
            Self::Bar | Self::Line | Self::Scatter | Self::Area => {
                matches!(payload, TracePayload::Xy { .. })
            }
            Self::Box | Self::Histogram => matches!(
                payload,
                TracePayload::Distribution { .. } | TracePayload::Xy { .. }
            ),
            Self::Pie => matches!(payload, TracePayload::Sectors { .. }),
            Self::Table => matches!(payload, TracePayload::Table { .. }),
        }
    }

    pub fn check_payload(self, payload: &TracePayload) -> FigureResult<()> {
        if !self.accepts(payload) {
            return Err(FigureError::PayloadKindMismatch {
                kind: self.name().to_owned(),
                payload: payload.shape_name().to_owned(),
            });
        }
        payload.validate_shape()
    }
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific data carried by a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum TracePayload {
    Xy { x: Vec<Datum>, y: Vec<Datum> },
    Distribution { values: Vec<Datum> },
    Sectors { labels: Vec<String>, values: Vec<f64> },
    Table {
        header: Vec<String>,
        columns: Vec<Vec<Datum>>,
    },
}

impl TracePayload {
    #[must_use]
    pub fn xy<X, Y>(x: impl IntoIterator<Item = X>, y: impl IntoIterator<Item = Y>) -> Self
    where
        X: Into<Datum>,
        Y: Into<Datum>,
    {
        Self::Xy {
            x: x.into_iter().map(Into::into).collect(),
            y: y.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Xy { .. } => "xy",
            Self::Distribution { .. } => "distribution",
            Self::Sectors { .. } => "sectors",
            Self::Table { .. } => "table",
        }
    }

    /// Number of data rows carried by the payload.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Xy { x, .. } => x.len(),
            Self::Distribution { values } => values.len(),
            Self::Sectors { values, .. } => values.len(),
            Self::Table { columns, .. } => columns.first().map_or(0, Vec::len),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate_shape(&self) -> FigureResult<()> {
        match self {
            Self::Xy { x, y } => {
                if x.len() != y.len() {
                    return Err(FigureError::shape_mismatch("y", x.len(), y.len()));
                }
                x.iter().try_for_each(|value| value.validate("x"))?;
                y.iter().try_for_each(|value| value.validate("y"))
            }
            Self::Distribution { values } => {
                values.iter().try_for_each(|value| value.validate("values"))
            }
            Self::Sectors { labels, values } => {
                if labels.len() != values.len() {
                    return Err(FigureError::shape_mismatch(
                        "values",
                        labels.len(),
                        values.len(),
                    ));
                }
                if values.iter().any(|value| !value.is_finite() || *value < 0.0) {
                    return Err(FigureError::InvalidData(
                        "sector values must be finite and >= 0".to_owned(),
                    ));
                }
                Ok(())
            }
            Self::Table { header, columns } => {
                if header.len() != columns.len() {
                    return Err(FigureError::shape_mismatch(
                        "columns",
                        header.len(),
                        columns.len(),
                    ));
                }
                let rows = columns.first().map_or(0, Vec::len);
                for column in columns {
                    if column.len() != rows {
                        return Err(FigureError::shape_mismatch("cells", rows, column.len()));
                    }
                    column.iter().try_for_each(|value| value.validate("cells"))?;
                }
                Ok(())
            }
        }
    }
}

/// Tri-state visibility of a trace.
///
/// Serialized as `true`, `false` or `"legendonly"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "VisibleRepr", into = "VisibleRepr")]
pub enum Visibility {
    #[default]
    Shown,
    Hidden,
    LegendOnly,
}

impl Visibility {
    #[must_use]
    pub const fn is_plotted(self) -> bool {
        matches!(self, Self::Shown)
    }

    #[must_use]
    pub const fn in_legend(self) -> bool {
        matches!(self, Self::Shown | Self::LegendOnly)
    }
}

impl From<bool> for Visibility {
    fn from(value: bool) -> Self {
        if value { Self::Shown } else { Self::Hidden }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum VisibleRepr {
    Flag(bool),
    Named(String),
}

impl TryFrom<VisibleRepr> for Visibility {
    type Error = String;

    fn try_from(value: VisibleRepr) -> Result<Self, Self::Error> {
        match value {
            VisibleRepr::Flag(flag) => Ok(Self::from(flag)),
            VisibleRepr::Named(name) if name == "legendonly" => Ok(Self::LegendOnly),
            VisibleRepr::Named(name) => Err(format!("unknown visibility `{name}`")),
        }
    }
}

impl From<Visibility> for VisibleRepr {
    fn from(value: Visibility) -> Self {
        match value {
            Visibility::Shown => Self::Flag(true),
            Visibility::Hidden => Self::Flag(false),
            Visibility::LegendOnly => Self::Named("legendonly".to_owned()),
        }
    }
}

/// Drawing mode hint for line-like traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    Lines,
    Markers,
    LinesMarkers,
    Text,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// A single data series of a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub kind: TraceKind,
    pub payload: TracePayload,
    #[serde(default)]
    pub visible: Visibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_ref: Option<AxisRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_group: Option<String>,
    /// Stable identifier for selector-based addressing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TraceMode>,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

impl Trace {
    pub fn new(kind: TraceKind, payload: TracePayload) -> FigureResult<Self> {
        kind.check_payload(&payload)?;
        Ok(Self {
            kind,
            payload,
            visible: Visibility::Shown,
            axis_ref: None,
            domain: None,
            name: None,
            legend_group: None,
            uid: None,
            opacity: 1.0,
            marker_color: None,
            mode: None,
            show_legend: true,
        })
    }

    pub fn xy<X, Y>(
        kind: TraceKind,
        x: impl IntoIterator<Item = X>,
        y: impl IntoIterator<Item = Y>,
    ) -> FigureResult<Self>
    where
        X: Into<Datum>,
        Y: Into<Datum>,
    {
        Self::new(kind, TracePayload::xy(x, y))
    }

    pub fn pie<L: Into<String>>(
        labels: impl IntoIterator<Item = L>,
        values: impl IntoIterator<Item = f64>,
    ) -> FigureResult<Self> {
        Self::new(
            TraceKind::Pie,
            TracePayload::Sectors {
                labels: labels.into_iter().map(Into::into).collect(),
                values: values.into_iter().collect(),
            },
        )
    }

    pub fn table<H: Into<String>>(
        header: impl IntoIterator<Item = H>,
        columns: Vec<Vec<Datum>>,
    ) -> FigureResult<Self> {
        Self::new(
            TraceKind::Table,
            TracePayload::Table {
                header: header.into_iter().map(Into::into).collect(),
                columns,
            },
        )
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_legend_group(mut self, group: impl Into<String>) -> Self {
        self.legend_group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: Visibility) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_axis_ref(mut self, axis_ref: AxisRef) -> Self {
        self.axis_ref = Some(axis_ref);
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    #[must_use]
    pub fn with_marker_color(mut self, color: impl Into<String>) -> Self {
        self.marker_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: TraceMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn is_axis_less(&self) -> bool {
        self.kind.is_axis_less()
    }

    /// Checks trace-local invariants; cross-references are checked by `Figure`.
    pub fn validate(&self) -> FigureResult<()> {
        self.kind.check_payload(&self.payload)?;
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(FigureError::InvalidData(
                "trace opacity must be within [0, 1]".to_owned(),
            ));
        }
        if let Some(domain) = self.domain {
            domain.validate()?;
        }
        Ok(())
    }
}
