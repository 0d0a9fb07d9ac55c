//! Extension points that observe a session without mutating it.

mod observers;

pub use observers::{FigureEvent, FigureObserver, ObserverContext};
