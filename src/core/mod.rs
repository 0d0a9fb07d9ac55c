pub mod axis;
pub mod figure;
pub mod frame;
pub mod layout;
pub mod trace;
pub mod types;

pub use axis::{Axis, AxisDim, AxisId, AxisRange, AxisRef, AxisType};
pub use figure::{Figure, FigureBuilder};
pub use frame::{Frame, FrameRef, FrameSequence};
pub use layout::{
    Annotation, BarMode, CoordRef, Font, Layout, Legend, LegendOrientation, SubplotCell,
};
pub use trace::{Trace, TraceKind, TraceMode, TracePayload, Visibility};
pub use types::{DOMAIN_EPSILON, Datum, Domain};
