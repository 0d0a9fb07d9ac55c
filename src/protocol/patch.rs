use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{
    Annotation, AxisId, AxisRange, AxisRef, AxisType, BarMode, Layout, LegendOrientation, Trace,
    TraceKind, TraceMode, TracePayload, Visibility,
};
use crate::error::{FigureError, FigureResult};
use crate::interaction::{Menu, Slider};

use super::{InvalidationLevel, InvalidationMask, InvalidationTopic};

/// `visible` argument of a trace patch.
///
/// A per-trace array is addressed by absolute trace position and must carry
/// exactly one entry per trace of the figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VisibleArg {
    Uniform(Visibility),
    PerTrace(Vec<Visibility>),
}

impl VisibleArg {
    pub fn check_len(&self, trace_count: usize) -> FigureResult<()> {
        match self {
            Self::PerTrace(values) if values.len() != trace_count => Err(
                FigureError::shape_mismatch("visible", trace_count, values.len()),
            ),
            _ => Ok(()),
        }
    }

    fn for_trace(&self, index: usize) -> Option<Visibility> {
        match self {
            Self::Uniform(visibility) => Some(*visibility),
            Self::PerTrace(values) => values.get(index).copied(),
        }
    }
}

/// Closed set of trace attributes a restyle may change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TracePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<VisibleArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TraceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<TracePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TraceMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_legend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_ref: Option<AxisRef>,
}

impl TracePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_visible(mut self, visibility: Visibility) -> Self {
        self.visible = Some(VisibleArg::Uniform(visibility));
        self
    }

    #[must_use]
    pub fn with_visible_per_trace(mut self, values: impl IntoIterator<Item = Visibility>) -> Self {
        self.visible = Some(VisibleArg::PerTrace(values.into_iter().collect()));
        self
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
    pub fn with_kind(mut self, kind: TraceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: TracePayload) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
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
    pub fn with_show_legend(mut self, show: bool) -> Self {
        self.show_legend = Some(show);
        self
    }

    #[must_use]
    pub fn with_axis_ref(mut self, axis_ref: AxisRef) -> Self {
        self.axis_ref = Some(axis_ref);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch to the trace at absolute position `index`.
    ///
    /// The trace is left untouched when the kind/payload pair is rejected.
    pub(crate) fn apply_to(&self, trace: &mut Trace, index: usize) -> FigureResult<()> {
        if self.kind.is_some() || self.payload.is_some() {
            let kind = self.kind.unwrap_or(trace.kind);
            let payload = self.payload.as_ref().unwrap_or(&trace.payload);
            kind.check_payload(payload)?;
            if let Some(payload) = &self.payload {
                trace.payload = payload.clone();
            }
            trace.kind = kind;
        }
        if let Some(visibility) = self.visible.as_ref().and_then(|arg| arg.for_trace(index)) {
            trace.visible = visibility;
        }
        if let Some(name) = &self.name {
            trace.name = Some(name.clone());
        }
        if let Some(group) = &self.legend_group {
            trace.legend_group = Some(group.clone());
        }
        if let Some(opacity) = self.opacity {
            trace.opacity = opacity;
        }
        if let Some(color) = &self.marker_color {
            trace.marker_color = Some(color.clone());
        }
        if let Some(mode) = self.mode {
            trace.mode = Some(mode);
        }
        if let Some(show) = self.show_legend {
            trace.show_legend = show;
        }
        if let Some(axis_ref) = self.axis_ref {
            trace.axis_ref = Some(axis_ref);
        }
        Ok(())
    }

    #[must_use]
    pub fn invalidation(&self) -> InvalidationMask {
        let mut mask = InvalidationMask::none();
        if self.kind.is_some() || self.axis_ref.is_some() {
            mask.raise(InvalidationLevel::Full, InvalidationTopic::Traces);
            mask.raise(InvalidationLevel::Full, InvalidationTopic::Axes);
        }
        if self.payload.is_some() {
            mask.raise(InvalidationLevel::Plot, InvalidationTopic::Traces);
        }
        if self.visible.is_some()
            || self.opacity.is_some()
            || self.marker_color.is_some()
            || self.mode.is_some()
        {
            mask.raise(InvalidationLevel::Style, InvalidationTopic::Traces);
        }
        if self.visible.is_some()
            || self.name.is_some()
            || self.legend_group.is_some()
            || self.show_legend.is_some()
        {
            mask.raise(InvalidationLevel::Style, InvalidationTopic::Legend);
        }
        mask
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegendPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<LegendOrientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Partial update of one existing axis; unnamed fields keep their value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<AxisRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tick_labels: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<AxisType>,
}

impl AxisPatch {
    #[must_use]
    pub fn range(start: f64, end: f64) -> Self {
        Self {
            range: Some(AxisRange::Fixed(start, end)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Closed set of layout attributes a relayout may change.
///
/// Nested patches are deep-merged: a patch naming `axes.x.title` leaves the
/// range of `x` alone. Lists (`annotations`, `menus`, `sliders`) are replaced
/// as a whole.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_legend: Option<bool>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub axes: IndexMap<AxisId, AxisPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menus: Option<Vec<Menu>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sliders: Option<Vec<Slider>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl LayoutPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: FontPatch) -> Self {
        self.font = Some(font);
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: LegendPatch) -> Self {
        self.legend = Some(legend);
        self
    }

    #[must_use]
    pub fn with_show_legend(mut self, show: bool) -> Self {
        self.show_legend = Some(show);
        self
    }

    /// Adds an axis patch, merging with a patch already recorded for `id`.
    #[must_use]
    pub fn with_axis(mut self, id: AxisId, patch: AxisPatch) -> Self {
        let entry = self.axes.entry(id).or_default();
        merge_axis_patch(entry, patch);
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = Some(annotations);
        self
    }

    #[must_use]
    pub fn with_menus(mut self, menus: Vec<Menu>) -> Self {
        self.menus = Some(menus);
        self
    }

    #[must_use]
    pub fn with_sliders(mut self, sliders: Vec<Slider>) -> Self {
        self.sliders = Some(sliders);
        self
    }

    #[must_use]
    pub fn with_bar_mode(mut self, bar_mode: BarMode) -> Self {
        self.bar_mode = Some(bar_mode);
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fails with `AxisRefResolution` when the patch names an axis `layout`
    /// does not have.
    pub fn check_axes(&self, layout: &Layout) -> FigureResult<()> {
        for id in self.axes.keys() {
            if !layout.has_axis(*id) {
                return Err(FigureError::AxisRefResolution(id.to_string()));
            }
        }
        Ok(())
    }

    /// Deep-merges the patch into `layout`.
    ///
    /// All axis references are checked before anything is written, so an
    /// error leaves `layout` unchanged.
    pub fn merge_into(&self, layout: &mut Layout) -> FigureResult<()> {
        self.check_axes(layout)?;

        if let Some(title) = &self.title {
            layout.title = Some(title.clone());
        }
        if let Some(font) = &self.font {
            if let Some(family) = &font.family {
                layout.font.family = family.clone();
            }
            if let Some(size) = font.size {
                layout.font.size = size;
            }
            if let Some(color) = &font.color {
                layout.font.color = color.clone();
            }
        }
        if let Some(legend) = &self.legend {
            if let Some(orientation) = legend.orientation {
                layout.legend.orientation = orientation;
            }
            if let Some(x) = legend.x {
                layout.legend.x = Some(x);
            }
            if let Some(y) = legend.y {
                layout.legend.y = Some(y);
            }
            if let Some(title) = &legend.title {
                layout.legend.title = Some(title.clone());
            }
        }
        if let Some(show) = self.show_legend {
            layout.show_legend = show;
        }
        for (id, patch) in &self.axes {
            if let Some(axis) = layout.axes.get_mut(id) {
                if let Some(range) = patch.range {
                    axis.range = range;
                }
                if let Some(title) = &patch.title {
                    axis.title = Some(title.clone());
                }
                if let Some(domain) = patch.domain {
                    axis.domain = domain;
                }
                if let Some(show) = patch.show_tick_labels {
                    axis.show_tick_labels = show;
                }
                if let Some(axis_type) = patch.axis_type {
                    axis.axis_type = axis_type;
                }
            }
        }
        if let Some(annotations) = &self.annotations {
            layout.annotations = annotations.clone();
        }
        if let Some(menus) = &self.menus {
            layout.menus = menus.clone();
        }
        if let Some(sliders) = &self.sliders {
            layout.sliders = sliders.clone();
        }
        if let Some(bar_mode) = self.bar_mode {
            layout.bar_mode = bar_mode;
        }
        if let Some(width) = self.width {
            layout.width = Some(width);
        }
        if let Some(height) = self.height {
            layout.height = Some(height);
        }
        Ok(())
    }

    #[must_use]
    pub fn invalidation(&self) -> InvalidationMask {
        let mut mask = InvalidationMask::none();
        if self.title.is_some() || self.font.is_some() {
            mask.raise(InvalidationLevel::Style, InvalidationTopic::Layout);
        }
        if self.legend.is_some() || self.show_legend.is_some() {
            mask.raise(InvalidationLevel::Style, InvalidationTopic::Legend);
        }
        for patch in self.axes.values() {
            if patch.domain.is_some() {
                mask.raise(InvalidationLevel::Full, InvalidationTopic::Axes);
            }
            if patch.range.is_some() || patch.axis_type.is_some() {
                mask.raise(InvalidationLevel::Plot, InvalidationTopic::Axes);
            }
            if patch.title.is_some() || patch.show_tick_labels.is_some() {
                mask.raise(InvalidationLevel::Style, InvalidationTopic::Axes);
            }
        }
        if self.annotations.is_some() {
            mask.raise(InvalidationLevel::Style, InvalidationTopic::Annotations);
        }
        if self.menus.is_some() || self.sliders.is_some() {
            mask.raise(InvalidationLevel::Style, InvalidationTopic::Controls);
        }
        if self.bar_mode.is_some() {
            mask.raise(InvalidationLevel::Plot, InvalidationTopic::Traces);
        }
        if self.width.is_some() || self.height.is_some() {
            mask.raise(InvalidationLevel::Full, InvalidationTopic::Layout);
        }
        mask
    }
}

fn merge_axis_patch(target: &mut AxisPatch, patch: AxisPatch) {
    if patch.range.is_some() {
        target.range = patch.range;
    }
    if patch.title.is_some() {
        target.title = patch.title;
    }
    if patch.domain.is_some() {
        target.domain = patch.domain;
    }
    if patch.show_tick_labels.is_some() {
        target.show_tick_labels = patch.show_tick_labels;
    }
    if patch.axis_type.is_some() {
        target.axis_type = patch.axis_type;
    }
}
