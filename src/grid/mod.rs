//! Subplot grid and facet composition.

mod composer;
mod facet;

pub use composer::{Cell, GridComposer, GridComposition, GridSpec, SharedAxes};
pub use facet::{FacetDirection, FacetKey, FacetSpec};
