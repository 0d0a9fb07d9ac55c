//! figure-rs: declarative interactive figures and their update protocol.
//!
//! A `Figure` is plain data (traces, layout, frames) that changes only through
//! validated protocol instructions: restyle, relayout, update and animate.
//! `FigureSession` serializes those instructions for one figure and drives a
//! `Renderer`.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod grid;
pub mod interaction;
pub mod protocol;
pub mod render;
pub mod telemetry;

pub use api::{FigureSession, SessionConfig};
pub use core::{Figure, FigureBuilder, Trace, TraceKind};
pub use error::{FigureError, FigureResult};
pub use protocol::{Instruction, RenderDelta};
