use criterion::{Criterion, criterion_group, criterion_main};
use figure_rs::api::{FigureSession, SessionConfig};
use figure_rs::core::{AxisId, Figure, Frame, Trace, TraceKind, TracePayload, Visibility};
use figure_rs::grid::{Cell, GridComposer, GridSpec, SharedAxes};
use figure_rs::interaction::TransitionSpec;
use figure_rs::protocol::{self, AnimateTarget, AxisPatch, LayoutPatch, TracePatch};
use figure_rs::render::NullRenderer;
use std::hint::black_box;

fn line_figure(trace_count: usize, points: usize, frame_count: usize) -> Figure {
    let traces = (0..trace_count).map(|series| {
        let x: Vec<f64> = (0..points).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..points)
            .map(|i| (i as f64 * 0.01 + series as f64).sin())
            .collect();
        Trace::xy(TraceKind::Line, x, y).expect("valid generated line")
    });
    let frames = (0..frame_count).map(|step| {
        let x: Vec<f64> = (0..points).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..points)
            .map(|i| (i as f64 * 0.01 + step as f64 * 0.1).cos())
            .collect();
        Frame::new(format!("step-{step}")).with_trace(0, TracePayload::xy(x, y))
    });
    Figure::builder()
        .traces(traces)
        .frames(frames)
        .build()
        .expect("valid generated figure")
}

fn bench_restyle_visibility_64(c: &mut Criterion) {
    let figure = line_figure(64, 200, 0);
    let patch = TracePatch::new().with_visible_per_trace(
        (0..64).map(|i| if i % 3 == 0 { Visibility::Hidden } else { Visibility::Shown }),
    );

    c.bench_function("restyle_visibility_64", |b| {
        b.iter(|| {
            let _ = protocol::restyle(black_box(&figure), None, black_box(&patch))
                .expect("restyle should succeed");
        })
    });
}

fn bench_relayout_axis_range(c: &mut Criterion) {
    let figure = line_figure(8, 1_000, 0);
    let patch = LayoutPatch::new()
        .with_title("zoomed")
        .with_axis(AxisId::x(1), AxisPatch::range(100.0, 400.0));

    c.bench_function("relayout_axis_range", |b| {
        b.iter(|| {
            let _ = protocol::relayout(black_box(&figure), black_box(&patch))
                .expect("relayout should succeed");
        })
    });
}

fn bench_animate_frames_2k(c: &mut Criterion) {
    let figure = line_figure(4, 2_000, 32);
    let target = AnimateTarget::frame("step-17");
    let transition = TransitionSpec::immediate();

    c.bench_function("animate_frames_2k", |b| {
        b.iter(|| {
            let (animated, _) =
                protocol::animate(black_box(&figure), black_box(&target), &transition)
                    .expect("animate should succeed");
            let _ = black_box(animated.displayed_traces());
        })
    });
}

fn bench_session_playback_ticks(c: &mut Criterion) {
    let figure = line_figure(2, 500, 60);
    let config = SessionConfig::default().with_default_transition(
        TransitionSpec::default()
            .with_duration_ms(40)
            .with_frame_duration_ms(10),
    );
    let mut session =
        FigureSession::new(NullRenderer::default(), figure, config).expect("session init");

    c.bench_function("session_playback_ticks", |b| {
        b.iter(|| {
            session.play().expect("play should succeed");
            for _ in 0..32 {
                let _ = session.tick(black_box(16));
            }
            session.pause().expect("pause should succeed");
        })
    });
}

fn bench_grid_compose_6x6(c: &mut Criterion) {
    c.bench_function("grid_compose_6x6", |b| {
        b.iter(|| {
            let spec = GridSpec::new(6, 6)
                .with_spacing(0.02, 0.03)
                .with_shared_x(SharedAxes::Columns)
                .with_shared_y(SharedAxes::Rows);
            let mut composer = GridComposer::new(black_box(spec)).expect("valid grid");
            for i in 0..36 {
                composer = composer.place(
                    Trace::xy(TraceKind::Scatter, [0.0, 1.0], [i as f64, 0.0])
                        .expect("valid scatter"),
                    Cell::new(i / 6 + 1, i % 6 + 1),
                );
            }
            let _ = composer
                .compose()
                .expect("compose should succeed")
                .build()
                .expect("figure should build");
        })
    });
}

criterion_group!(
    benches,
    bench_restyle_visibility_64,
    bench_relayout_axis_range,
    bench_animate_frames_2k,
    bench_session_playback_ticks,
    bench_grid_compose_6x6
);
criterion_main!(benches);
