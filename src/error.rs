use thiserror::Error;

pub type FigureResult<T> = Result<T, FigureError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FigureError {
    #[error("shape mismatch for `{field}`: expected {expected} entries, got {actual}")]
    ShapeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("trace index {index} is out of range for {len} traces")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown frame: {0}")]
    UnknownFrame(String),

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("payload `{payload}` is not compatible with trace kind `{kind}`")]
    PayloadKindMismatch { kind: String, payload: String },

    #[error("axis reference `{0}` does not resolve to a layout axis")]
    AxisRefResolution(String),

    #[error("frame name `{0}` is already used")]
    DuplicateFrame(String),

    #[error("no trace carries uid `{0}`")]
    UnknownTraceUid(String),

    #[error("unknown control: {0}")]
    UnknownControl(String),

    #[error("instruction queue is full ({capacity} pending)")]
    QueueFull { capacity: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl FigureError {
    pub(crate) fn shape_mismatch(field: &str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            field: field.to_owned(),
            expected,
            actual,
        }
    }
}
