use figure_rs::core::{Figure, Frame, Trace, TraceKind, TracePayload, Visibility};
use figure_rs::error::FigureError;
use figure_rs::interaction::TransitionSpec;
use figure_rs::protocol::{self, AnimateTarget, Instruction, LayoutPatch, TracePatch};
use proptest::prelude::*;

fn visibility() -> impl Strategy<Value = Visibility> {
    prop_oneof![
        Just(Visibility::Shown),
        Just(Visibility::Hidden),
        Just(Visibility::LegendOnly),
    ]
}

fn figure_with(trace_count: usize, frame_count: usize) -> Figure {
    let traces = (0..trace_count).map(|index| {
        Trace::xy(TraceKind::Line, [0.0, 1.0], [index as f64, 0.0]).expect("line")
    });
    let frames = (0..frame_count).map(|step| {
        Frame::new(format!("f{step}")).with_trace(
            0,
            TracePayload::xy([0.0, 1.0], [step as f64, step as f64 * 2.0]),
        )
    });
    Figure::builder()
        .traces(traces)
        .frames(frames)
        .build()
        .expect("figure")
}

proptest! {
    #[test]
    fn visible_array_is_positional(
        (trace_count, values) in (1usize..8)
            .prop_flat_map(|n| (Just(n), prop::collection::vec(visibility(), n)))
    ) {
        let mut figure = figure_with(trace_count, 0);
        figure
            .apply(&Instruction::restyle(
                TracePatch::new().with_visible_per_trace(values.clone()),
            ))
            .expect("restyle");
        let applied: Vec<Visibility> = figure.traces().iter().map(|trace| trace.visible).collect();
        prop_assert_eq!(applied, values);
    }

    #[test]
    fn wrong_length_visible_array_never_mutates(
        trace_count in 1usize..8,
        len in 0usize..10
    ) {
        prop_assume!(len != trace_count);
        let mut figure = figure_with(trace_count, 0);
        let before = figure.clone();
        let err = figure
            .apply(&Instruction::restyle(
                TracePatch::new().with_visible_per_trace(vec![Visibility::Hidden; len]),
            ))
            .expect_err("length mismatch");
        let is_shape_mismatch = matches!(err, FigureError::ShapeMismatch { .. });
        prop_assert!(is_shape_mismatch);
        prop_assert_eq!(figure, before);
    }

    #[test]
    fn relayout_is_idempotent(
        title in "[a-zA-Z ]{0,24}",
        show_legend in any::<bool>(),
        width in 100u32..2000,
        height in 100u32..2000
    ) {
        let figure = figure_with(2, 0);
        let patch = LayoutPatch::new()
            .with_title(title)
            .with_show_legend(show_legend)
            .with_size(width, height);
        let (once, _) = protocol::relayout(&figure, &patch).expect("once");
        let (twice, _) = protocol::relayout(&once, &patch).expect("twice");
        prop_assert_eq!(once.layout(), twice.layout());
    }

    #[test]
    fn zero_duration_animation_depends_only_on_last_target(
        path in prop::collection::vec(0usize..6, 1..12)
    ) {
        let mut figure = figure_with(3, 6);
        for &step in &path {
            figure
                .apply(&Instruction::animate(
                    AnimateTarget::frame(step),
                    TransitionSpec::immediate(),
                ))
                .expect("animate");
        }

        let last = *path.last().expect("non-empty path");
        let mut direct = figure_with(3, 6);
        direct
            .apply(&Instruction::animate(
                AnimateTarget::frame(last),
                TransitionSpec::immediate(),
            ))
            .expect("animate direct");

        prop_assert_eq!(figure.displayed_traces(), direct.displayed_traces());
        prop_assert_eq!(figure.traces(), direct.traces());
        let expected_frame = format!("f{last}");
        prop_assert_eq!(figure.playback().active_frame(), Some(expected_frame.as_str()));
    }
}
