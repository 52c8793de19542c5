//! Boundary tracing over sets of grid cells.
//!
//! A [`CellSet`] names the cells of one candidate boundary. Tracing
//! classifies it as open, closed or mixed, and the
//! [`AbstractionGrid`] resolves boundaries that touch each other by
//! redrawing them at triple resolution, where distinct outlines no
//! longer share cells.

mod abstraction;
mod cellset;

pub use abstraction::AbstractionGrid;
pub use cellset::{CellSet, SetKind};
