use figure_rs::core::{DOMAIN_EPSILON, Trace, TraceKind};
use figure_rs::grid::{Cell, GridComposer, GridSpec};
use proptest::prelude::*;

fn weights(count: usize) -> impl Strategy<Value = Option<Vec<f64>>> {
    prop::option::of(prop::collection::vec(0.1f64..10.0, count))
}

proptest! {
    #[test]
    fn composed_cells_tile_the_canvas_without_overlap(
        (rows, cols, column_widths, row_heights) in (1usize..6, 1usize..6)
            .prop_flat_map(|(rows, cols)| (Just(rows), Just(cols), weights(cols), weights(rows)))
    ) {
        let mut spec = GridSpec::new(rows, cols);
        if let Some(widths) = column_widths {
            spec = spec.with_column_widths(widths);
        }
        if let Some(heights) = row_heights {
            spec = spec.with_row_heights(heights);
        }
        let mut composer = GridComposer::new(spec).expect("grid");
        for row in 1..=rows {
            for col in 1..=cols {
                let trace = Trace::xy(TraceKind::Scatter, [1.0], [row as f64])
                    .expect("scatter");
                composer = composer.place(trace, Cell::new(row, col));
            }
        }
        let figure = composer.compose().expect("compose").build().expect("figure");
        let cells = &figure.layout().cells;
        prop_assert_eq!(cells.len(), rows * cols);

        for (index, cell) in cells.iter().enumerate() {
            for other in &cells[index + 1..] {
                prop_assert!(!cell.domain.overlaps(other.domain));
            }
        }

        let area: f64 = cells.iter().map(|cell| cell.domain.area()).sum();
        prop_assert!((area - 1.0).abs() <= 1e-9);
        let min_x = cells.iter().map(|cell| cell.domain.x.0).fold(f64::INFINITY, f64::min);
        let max_x = cells.iter().map(|cell| cell.domain.x.1).fold(f64::NEG_INFINITY, f64::max);
        let min_y = cells.iter().map(|cell| cell.domain.y.0).fold(f64::INFINITY, f64::min);
        let max_y = cells.iter().map(|cell| cell.domain.y.1).fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(min_x.abs() <= DOMAIN_EPSILON);
        prop_assert!((max_x - 1.0).abs() <= DOMAIN_EPSILON);
        prop_assert!(min_y.abs() <= DOMAIN_EPSILON);
        prop_assert!((max_y - 1.0).abs() <= DOMAIN_EPSILON);

        for (index, trace) in figure.traces().iter().enumerate() {
            let axes = trace.axis_ref.expect("bound trace");
            prop_assert_eq!(cells[index].axes, Some(axes));
        }
    }

    #[test]
    fn spacing_keeps_cells_apart(
        rows in 1usize..5,
        cols in 1usize..5,
        gap in 0.0f64..0.1
    ) {
        let spec = GridSpec::new(rows, cols).with_spacing(gap, gap);
        let layout = GridComposer::new(spec)
            .expect("grid")
            .compose()
            .expect("compose")
            .layout;
        for (index, cell) in layout.cells.iter().enumerate() {
            for other in &layout.cells[index + 1..] {
                prop_assert!(!cell.domain.overlaps(other.domain));
            }
        }
    }
}
