use figure_rs::core::{
    Axis, AxisId, AxisRef, Domain, Figure, Frame, Layout, Trace, TraceKind, TracePayload,
    Visibility,
};
use figure_rs::grid::{Cell, GridComposer, GridSpec};
use figure_rs::error::FigureError;
use figure_rs::interaction::{PlaybackState, TransitionSpec};
use figure_rs::protocol::{
    self, AnimateTarget, AxisPatch, Instruction, InvalidationLevel, InvalidationTopic,
    LayoutPatch, TracePatch, TraceSelector,
};

fn three_trace_figure() -> Figure {
    Figure::builder()
        .layout(Layout::default().with_title("GDP per continent"))
        .trace(
            Trace::xy(TraceKind::Bar, ["Asia", "Europe"], [1.0, 2.0])
                .expect("bar")
                .with_uid("bars"),
        )
        .trace(
            Trace::xy(TraceKind::Line, [1.0, 2.0], [3.0, 4.0])
                .expect("line")
                .with_uid("line"),
        )
        .trace(
            Trace::xy(TraceKind::Scatter, [1.0, 2.0], [5.0, 6.0])
                .expect("scatter")
                .with_uid("points"),
        )
        .build()
        .expect("figure")
}

fn year_frames() -> Vec<Frame> {
    ["1902", "1908", "1914", "1920", "1926", "1932"]
        .into_iter()
        .enumerate()
        .map(|(step, name)| {
            let offset = step as f64 * 10.0;
            Frame::new(name).with_trace(
                0,
                TracePayload::xy(["Asia", "Europe"], [offset + 1.0, offset + 2.0]),
            )
        })
        .collect()
}

#[test]
fn restyle_with_positional_visible_array_sets_each_trace() {
    let figure = three_trace_figure();
    let patch = TracePatch::new().with_visible_per_trace([
        Visibility::Shown,
        Visibility::Hidden,
        Visibility::Hidden,
    ]);

    let (next, delta) =
        protocol::restyle(&figure, Some(&TraceSelector::Indices(vec![0, 1, 2])), &patch)
            .expect("restyle");

    let visible: Vec<Visibility> = next.traces().iter().map(|trace| trace.visible).collect();
    assert_eq!(
        visible,
        vec![Visibility::Shown, Visibility::Hidden, Visibility::Hidden]
    );
    assert_eq!(next.layout(), figure.layout());
    assert_eq!(delta.mask.level(), InvalidationLevel::Style);
    assert!(delta.mask.has_topic(InvalidationTopic::Traces));
    assert_eq!(delta.traces.as_slice(), &[0, 1, 2]);
}

#[test]
fn positional_entries_apply_by_absolute_index_for_partial_selection() {
    let figure = three_trace_figure();
    let patch = TracePatch::new().with_visible_per_trace([
        Visibility::Hidden,
        Visibility::LegendOnly,
        Visibility::Hidden,
    ]);

    let (next, _) = protocol::restyle(&figure, Some(&TraceSelector::Indices(vec![1])), &patch)
        .expect("restyle");

    assert_eq!(next.traces()[0].visible, Visibility::Shown);
    assert_eq!(next.traces()[1].visible, Visibility::LegendOnly);
    assert_eq!(next.traces()[2].visible, Visibility::Shown);
}

#[test]
fn restyle_rejects_short_visible_array_without_mutation() {
    let mut figure = three_trace_figure();
    let before = figure.clone();
    let instruction = Instruction::restyle(
        TracePatch::new().with_visible_per_trace([Visibility::Shown, Visibility::Hidden]),
    );

    let err = figure.apply(&instruction).expect_err("two entries for three traces");

    assert_eq!(
        err,
        FigureError::ShapeMismatch {
            field: "visible".to_owned(),
            expected: 3,
            actual: 2,
        }
    );
    assert_eq!(figure, before);
}

#[test]
fn restyle_out_of_range_index_is_rejected() {
    let figure = three_trace_figure();
    let err = protocol::restyle(
        &figure,
        Some(&TraceSelector::Indices(vec![0, 3])),
        &TracePatch::new().with_name("late"),
    )
    .expect_err("index 3 is out of range");
    assert_eq!(err, FigureError::IndexOutOfRange { index: 3, len: 3 });
}

#[test]
fn uid_selector_resolves_to_positions() {
    let figure = three_trace_figure();
    let selector = TraceSelector::Uids(vec!["points".to_owned()]);
    let (next, delta) = protocol::restyle(
        &figure,
        Some(&selector),
        &TracePatch::new().with_marker_color("#d62728"),
    )
    .expect("restyle by uid");
    assert_eq!(delta.traces.as_slice(), &[2]);
    assert_eq!(next.traces()[2].marker_color.as_deref(), Some("#d62728"));

    let unknown = TraceSelector::Uids(vec!["missing".to_owned()]);
    let err = protocol::restyle(&figure, Some(&unknown), &TracePatch::new().with_name("x"))
        .expect_err("unknown uid");
    assert_eq!(err, FigureError::UnknownTraceUid("missing".to_owned()));
}

#[test]
fn kind_change_must_fit_payload() {
    let mut figure = three_trace_figure();
    let before = figure.clone();
    let err = figure
        .apply(&Instruction::restyle_traces(
            vec![0],
            TracePatch::new().with_kind(TraceKind::Pie),
        ))
        .expect_err("pie needs sectors");
    assert!(matches!(err, FigureError::PayloadKindMismatch { .. }));
    assert_eq!(figure, before);
}

fn sectors() -> TracePayload {
    TracePayload::Sectors {
        labels: vec!["Asia".to_owned(), "Europe".to_owned()],
        values: vec![1.0, 2.0],
    }
}

#[test]
fn bar_turned_pie_takes_its_cell_domain() {
    let mut figure = three_trace_figure();
    let delta = figure
        .apply(&Instruction::restyle_traces(
            vec![0],
            TracePatch::new()
                .with_kind(TraceKind::Pie)
                .with_payload(sectors()),
        ))
        .expect("pie fits sectors");

    let pie = &figure.traces()[0];
    assert_eq!(pie.kind, TraceKind::Pie);
    assert_eq!(pie.axis_ref, None);
    assert_eq!(pie.domain, Some(Domain::full()));
    assert_eq!(delta.mask.level(), InvalidationLevel::Full);
}

#[test]
fn pie_turned_bar_binds_to_axes_of_its_cell() {
    let mut figure = GridComposer::new(GridSpec::new(1, 2))
        .expect("grid")
        .place(
            Trace::xy(TraceKind::Bar, ["a"], [1.0]).expect("bar"),
            Cell::new(1, 1),
        )
        .place(Trace::pie(["a", "b"], [1.0, 2.0]).expect("pie"), Cell::new(1, 2))
        .compose()
        .expect("compose")
        .build()
        .expect("figure");
    assert_eq!(figure.layout().cells[1].axes, None);
    let pie_domain = figure.traces()[1].domain.expect("pie domain");

    figure
        .apply(&Instruction::restyle_traces(
            vec![1],
            TracePatch::new()
                .with_kind(TraceKind::Bar)
                .with_payload(TracePayload::xy(["a", "b"], [1.0, 2.0])),
        ))
        .expect("bar fits xy");

    let axes = AxisRef::new(AxisId::x(2), AxisId::y(2));
    let bar = &figure.traces()[1];
    assert_eq!(bar.axis_ref, Some(axes));
    assert_eq!(bar.domain, None);
    assert_eq!(figure.layout().cells[1].axes, Some(axes));
    let x2 = figure.layout().axis(AxisId::x(2)).expect("x2 created");
    assert_eq!(x2.domain, pie_domain.x);
}

#[test]
fn pie_without_a_cell_turns_into_bar_on_primary_axes() {
    let mut figure = Figure::builder()
        .trace(Trace::pie(["a", "b"], [1.0, 2.0]).expect("pie"))
        .build()
        .expect("figure");
    assert!(figure.layout().axes.is_empty());

    figure
        .apply(&Instruction::restyle(
            TracePatch::new()
                .with_kind(TraceKind::Bar)
                .with_payload(TracePayload::xy(["a", "b"], [1.0, 2.0])),
        ))
        .expect("bar fits xy");

    assert_eq!(figure.traces()[0].axis_ref, Some(AxisRef::primary()));
    assert!(figure.layout().has_axis(AxisId::x(1)));
    assert!(figure.layout().has_axis(AxisId::y(1)));
}

#[test]
fn paper_traces_cannot_reference_axes() {
    let err = Figure::builder()
        .trace(Trace::xy(TraceKind::Bar, ["a"], [1.0]).expect("bar"))
        .trace(
            Trace::pie(["a"], [1.0])
                .expect("pie")
                .with_axis_ref(AxisRef::primary()),
        )
        .build()
        .expect_err("pie bound to axes");
    assert!(matches!(err, FigureError::AxisRefResolution(_)));

    let mut figure = three_trace_figure();
    let before = figure.clone();
    let err = figure
        .apply(&Instruction::restyle_traces(
            vec![0],
            TracePatch::new()
                .with_kind(TraceKind::Pie)
                .with_payload(sectors())
                .with_axis_ref(AxisRef::primary()),
        ))
        .expect_err("explicit axes on a pie");
    assert!(matches!(err, FigureError::AxisRefResolution(_)));
    assert_eq!(figure, before);
}

#[test]
fn relayout_twice_equals_relayout_once() {
    let figure = three_trace_figure();
    let patch = LayoutPatch::new()
        .with_title("Life expectancy")
        .with_axis(AxisId::x(1), AxisPatch::range(0.0, 10.0))
        .with_axis(AxisId::y(1), AxisPatch::title("years"));

    let (once, _) = protocol::relayout(&figure, &patch).expect("first relayout");
    let (twice, _) = protocol::relayout(&once, &patch).expect("second relayout");

    assert_eq!(once, twice);
    assert_eq!(once.layout().title.as_deref(), Some("Life expectancy"));
}

#[test]
fn relayout_unknown_axis_fails_with_axis_ref_resolution() {
    let figure = three_trace_figure();
    let patch = LayoutPatch::new().with_axis(AxisId::y(2), AxisPatch::title("right"));
    let err = protocol::relayout(&figure, &patch).expect_err("y2 is not declared");
    assert_eq!(err, FigureError::AxisRefResolution("y2".to_owned()));
}

#[test]
fn update_is_all_or_nothing() {
    let mut figure = three_trace_figure();
    let before = figure.clone();
    let instruction = Instruction::Update {
        traces: Some(TraceSelector::Indices(vec![7])),
        trace_patch: TracePatch::new().with_visible(Visibility::Hidden),
        layout_patch: LayoutPatch::new().with_title("never applied"),
    };

    let err = figure.apply(&instruction).expect_err("index 7 is out of range");

    assert!(matches!(err, FigureError::IndexOutOfRange { index: 7, .. }));
    assert_eq!(figure, before);
}

#[test]
fn update_applies_both_halves_in_one_delta() {
    let mut figure = three_trace_figure();
    let delta = figure
        .apply(&Instruction::update(
            TracePatch::new().with_visible_per_trace([
                Visibility::Hidden,
                Visibility::Shown,
                Visibility::Hidden,
            ]),
            LayoutPatch::new().with_title("Only the line"),
        ))
        .expect("update");

    assert_eq!(figure.traces()[1].visible, Visibility::Shown);
    assert_eq!(figure.traces()[0].visible, Visibility::Hidden);
    assert_eq!(figure.layout().title.as_deref(), Some("Only the line"));
    assert!(delta.mask.has_topic(InvalidationTopic::Traces));
    assert!(delta.mask.has_topic(InvalidationTopic::Layout));
}

#[test]
fn skip_changes_nothing() {
    let mut figure = three_trace_figure();
    let before = figure.clone();
    let delta = figure.apply(&Instruction::Skip).expect("skip");
    assert!(delta.is_none());
    assert_eq!(figure, before);
}

#[test]
fn zero_duration_animate_lands_on_last_target() {
    let mut figure = Figure::builder()
        .trace(Trace::xy(TraceKind::Bar, ["Asia", "Europe"], [0.0, 0.0]).expect("bar"))
        .frames(year_frames())
        .build()
        .expect("figure");

    for name in ["1920", "1908"] {
        figure
            .apply(&Instruction::animate(
                AnimateTarget::frame(name),
                TransitionSpec::immediate(),
            ))
            .expect("animate");
    }

    let expected = figure
        .frames()
        .get("1908")
        .and_then(|frame| frame.traces.get(&0))
        .cloned()
        .expect("frame payload");
    assert_eq!(figure.displayed_traces()[0].payload, expected);
    assert_eq!(
        figure.playback().state(),
        &PlaybackState::Showing {
            frame: "1908".to_owned()
        }
    );
    // Base traces are never rewritten by animation.
    assert_eq!(
        figure.traces()[0].payload,
        TracePayload::xy(["Asia", "Europe"], [0.0, 0.0])
    );
}

#[test]
fn animate_by_index_and_unknown_name() {
    let mut figure = Figure::builder()
        .trace(Trace::xy(TraceKind::Bar, ["Asia", "Europe"], [0.0, 0.0]).expect("bar"))
        .frames(year_frames())
        .build()
        .expect("figure");

    figure
        .apply(&Instruction::animate(
            AnimateTarget::frame(2usize),
            TransitionSpec::immediate(),
        ))
        .expect("animate by index");
    assert_eq!(figure.playback().active_frame(), Some("1914"));

    let before = figure.clone();
    let err = figure
        .apply(&Instruction::animate(
            AnimateTarget::frame("2000"),
            TransitionSpec::immediate(),
        ))
        .expect_err("unknown frame");
    assert_eq!(err, FigureError::UnknownFrame("2000".to_owned()));
    assert_eq!(figure, before);
}

#[test]
fn animate_advertises_transition_and_frame_layout() {
    let mut figure = Figure::builder()
        .trace(Trace::xy(TraceKind::Line, [1.0], [1.0]).expect("line"))
        .layout(Layout::default().with_axis(Axis::new(AxisId::x(1)).with_range(0.0, 1.0)))
        .frame(Frame::new("zoomed").with_layout(
            LayoutPatch::new().with_axis(AxisId::x(1), AxisPatch::range(0.0, 100.0)),
        ))
        .frame(Frame::new("wide"))
        .build()
        .expect("figure");

    figure
        .apply(&Instruction::animate(
            AnimateTarget::frame("wide"),
            TransitionSpec::default(),
        ))
        .expect("first animate");
    let transition = TransitionSpec::default().with_duration_ms(750);
    let delta = figure
        .apply(&Instruction::animate(AnimateTarget::frame("zoomed"), transition))
        .expect("second animate");

    assert_eq!(delta.transition, Some(transition));
    assert!(delta.mask.has_topic(InvalidationTopic::Animation));
    assert!(delta.mask.has_topic(InvalidationTopic::Layout));
    let displayed = figure.displayed_layout();
    let axis = displayed.axis(AxisId::x(1)).expect("x axis");
    assert_eq!(axis.range, figure_rs::core::AxisRange::Fixed(0.0, 100.0));
    assert_eq!(
        figure.layout().axis(AxisId::x(1)).expect("base axis").range,
        figure_rs::core::AxisRange::Fixed(0.0, 1.0)
    );
}
