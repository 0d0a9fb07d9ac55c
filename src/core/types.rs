use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{FigureError, FigureResult};

/// Tolerance used when comparing normalized paper coordinates.
pub const DOMAIN_EPSILON: f64 = 1e-9;

/// One value of a trace payload column.
///
/// The core never coerces between variants; data preparation collaborators
/// decide which variant a column carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    Missing,
    Number(f64),
    Time(DateTime<Utc>),
    Text(String),
}

impl Datum {
    pub fn from_decimal(value: Decimal, field_name: &str) -> FigureResult<Self> {
        value.to_f64().map(Self::Number).ok_or_else(|| {
            FigureError::InvalidData(format!("{field_name} cannot be represented as f64"))
        })
    }

    #[must_use]
    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        Self::Time(time)
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Time(time) => Some(time.timestamp_millis() as f64 / 1000.0),
            Self::Missing | Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub(crate) fn validate(&self, field_name: &str) -> FigureResult<()> {
        if let Self::Number(value) = self {
            if !value.is_finite() {
                return Err(FigureError::InvalidData(format!(
                    "{field_name} contains a non-finite number"
                )));
            }
        }
        Ok(())
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for Datum {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

/// Validates a normalized `[start, end]` span inside `[0, 1]`.
pub(crate) fn validate_span(span: (f64, f64), what: &str) -> FigureResult<()> {
    let (start, end) = span;
    if !start.is_finite() || !end.is_finite() {
        return Err(FigureError::InvalidData(format!(
            "{what} must be finite"
        )));
    }
    if start < -DOMAIN_EPSILON || end > 1.0 + DOMAIN_EPSILON || start >= end {
        return Err(FigureError::InvalidData(format!(
            "{what} must satisfy 0 <= start < end <= 1, got [{start}, {end}]"
        )));
    }
    Ok(())
}

/// Normalized paper rectangle `x × y` within the figure canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Default for Domain {
    fn default() -> Self {
        Self::full()
    }
}

impl Domain {
    #[must_use]
    pub const fn full() -> Self {
        Self {
            x: (0.0, 1.0),
            y: (0.0, 1.0),
        }
    }

    pub fn new(x: (f64, f64), y: (f64, f64)) -> FigureResult<Self> {
        let domain = Self { x, y };
        domain.validate()?;
        Ok(domain)
    }

    pub fn validate(self) -> FigureResult<()> {
        validate_span(self.x, "domain x span")?;
        validate_span(self.y, "domain y span")
    }

    #[must_use]
    pub fn width(self) -> f64 {
        (self.x.1 - self.x.0).max(0.0)
    }

    #[must_use]
    pub fn height(self) -> f64 {
        (self.y.1 - self.y.0).max(0.0)
    }

    #[must_use]
    pub fn area(self) -> f64 {
        self.width() * self.height()
    }

    /// Returns `true` when the interiors of both rectangles intersect.
    ///
    /// Rectangles that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        let x_overlap = self.x.1.min(other.x.1) - self.x.0.max(other.x.0);
        let y_overlap = self.y.1.min(other.y.1) - self.y.0.max(other.y.0);
        x_overlap > DOMAIN_EPSILON && y_overlap > DOMAIN_EPSILON
    }

    /// Paper point at the horizontal center of the top edge.
    #[must_use]
    pub fn top_center(self) -> (f64, f64) {
        ((self.x.0 + self.x.1) / 2.0, self.y.1)
    }
}

#[cfg(test)]
mod tests {
    use super::{Datum, Domain};

    #[test]
    fn edge_sharing_domains_do_not_overlap() {
        let left = Domain::new((0.0, 0.5), (0.0, 1.0)).expect("left");
        let right = Domain::new((0.5, 1.0), (0.0, 1.0)).expect("right");
        assert!(!left.overlaps(right));
        let wide = Domain::new((0.25, 0.75), (0.0, 0.5)).expect("wide");
        assert!(wide.overlaps(left));
        assert!(wide.overlaps(right));
    }

    #[test]
    fn inverted_domain_is_rejected() {
        assert!(Domain::new((0.6, 0.4), (0.0, 1.0)).is_err());
        assert!(Domain::new((0.0, 1.2), (0.0, 1.0)).is_err());
    }

    #[test]
    fn datum_json_keeps_variant() {
        let values: Vec<Datum> =
            serde_json::from_str(r#"[1.5, "Asia", null, "1908-01-01T00:00:00Z"]"#)
                .expect("parse data");
        assert_eq!(values[0], Datum::Number(1.5));
        assert_eq!(values[1], Datum::Text("Asia".to_owned()));
        assert!(values[2].is_missing());
        assert!(matches!(values[3], Datum::Time(_)));
    }
}
