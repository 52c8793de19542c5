//! Renderer-facing primitives produced by the extraction pipeline.
//!
//! A diagram is a flat arena of [`Shape`]s, a list of [`CompositeShape`]s
//! grouping related open shapes by arena index, and a list of
//! [`TextObject`] labels. Everything here is plain data; rendering is the
//! consumer's job.

mod composite;
mod font;
mod shape;
mod text;

pub use composite::CompositeShape;
pub use font::{FontMeasurer, measurer};
pub use shape::{CustomShapeDefinition, PointKind, Shape, ShapeKind, ShapePoint};
pub use text::{Alignment, TextObject};
