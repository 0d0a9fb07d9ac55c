use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use figure_rs::core::{Datum, Figure, Trace, TraceKind, TracePayload};
use figure_rs::error::FigureError;
use figure_rs::grid::FacetKey;

#[test]
fn datum_from_decimal_is_supported() {
    let datum = Datum::from_decimal(Decimal::new(12345, 2), "price").expect("datum");
    let value = datum.as_f64().expect("numeric");
    assert!((value - 123.45).abs() <= 1e-9);

    let large = Datum::from_decimal(Decimal::MAX, "volume").expect("large decimal");
    assert!(large.as_f64().expect("numeric") > 7.9e28);
}

#[test]
fn datum_from_datetime_reads_as_seconds() {
    let time = Utc
        .timestamp_opt(1_700_000_000, 0)
        .single()
        .expect("valid ts");
    let datum = Datum::from_datetime(time);

    assert!((datum.as_f64().expect("time as seconds") - 1_700_000_000.0).abs() <= 1e-6);
    assert_eq!(FacetKey::from(&datum).to_string(), time.to_rfc3339());
    assert!(!datum.is_missing());
    assert_eq!(Datum::Text("a".to_owned()).as_f64(), None);
}

#[test]
fn decimal_and_time_columns_build_a_trace() {
    let times: Vec<Datum> = (0..3)
        .map(|day| {
            let time = Utc
                .timestamp_opt(1_700_000_000 + day * 86_400, 0)
                .single()
                .expect("valid ts");
            Datum::from_datetime(time)
        })
        .collect();
    let closes: Vec<Datum> = [Decimal::new(1000, 1), Decimal::new(1025, 1), Decimal::new(990, 1)]
        .into_iter()
        .map(|close| Datum::from_decimal(close, "close").expect("close"))
        .collect();

    let figure = Figure::builder()
        .trace(Trace::xy(TraceKind::Line, times.clone(), closes).expect("line"))
        .build()
        .expect("figure");

    let json = serde_json::to_string(figure.trace(0).expect("trace")).expect("serialize");
    let parsed: Trace = serde_json::from_str(&json).expect("parse");
    let TracePayload::Xy { x, y } = &parsed.payload else {
        panic!("xy payload expected");
    };
    assert_eq!(x, &times);
    assert!((y[1].as_f64().expect("numeric") - 102.5).abs() <= 1e-9);
}

#[test]
fn non_finite_numbers_are_rejected() {
    let err = Trace::xy(TraceKind::Scatter, [1.0, 2.0], [f64::NAN, 1.0])
        .expect_err("nan in y");
    assert!(matches!(err, FigureError::InvalidData(_)));

    let err = Trace::pie(["a"], [f64::INFINITY]).expect_err("infinite sector");
    assert!(matches!(err, FigureError::InvalidData(_)));
}
