//! Asciagram - Structured diagrams from ASCII art.
//!
//! Loading, tracing, and shape extraction for ASCII-art diagrams.
//! Boxes, lines, arrowheads and labels drawn with plain characters are
//! turned into polygons, polylines and positioned text objects.

pub mod config;
pub mod grid;
pub mod trace;

mod diagram;
mod edges;
mod error;
mod shapes;
mod text;

pub use asciagram_core::{color, draw, geometry};

pub use diagram::{Diagram, GridScale};
pub use error::AsciagramError;

use std::io::Read;

use log::info;

use config::ProcessingConfig;
use grid::TextGrid;

/// Builder for processing ASCII-art diagrams.
///
/// # Examples
///
/// ```rust
/// use asciagram::{DiagramBuilder, config::ProcessingConfig};
///
/// let source = "\
/// +-------+
/// | Hello |
/// +-------+";
///
/// // With custom config
/// let mut config = ProcessingConfig::new();
/// config.set_all_corners_round(true);
/// let builder = DiagramBuilder::new(config);
/// let diagram = builder.build(source).expect("Failed to process");
/// assert_eq!(diagram.shapes().len(), 1);
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagramBuilder {
    config: ProcessingConfig,
}

impl DiagramBuilder {
    /// Create a new builder with the given processing configuration.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Process source text into a [`Diagram`].
    ///
    /// The text is normalized into a grid, its boundaries are traced
    /// into shapes, and the remaining characters become labels.
    ///
    /// # Errors
    ///
    /// Returns [`AsciagramError::EmptyGrid`] when the source holds no
    /// visible characters.
    pub fn build(&self, source: &str) -> Result<Diagram, AsciagramError> {
        if source.chars().all(char::is_whitespace) {
            return Err(AsciagramError::EmptyGrid);
        }
        let grid = TextGrid::from_source(source, self.config.tab_size());
        info!(width = grid.width(), height = grid.height(); "Processing grid");

        let diagram = Diagram::build(&grid, &self.config);
        info!(
            shapes = diagram.shapes().len(),
            composites = diagram.composites().len(),
            texts = diagram.texts().len();
            "Extracted diagram"
        );
        Ok(diagram)
    }

    /// Process source text from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`AsciagramError::Io`] when reading fails, or any error
    /// from [`DiagramBuilder::build`].
    pub fn build_from_reader(&self, mut reader: impl Read) -> Result<Diagram, AsciagramError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        self.build(&source)
    }
}
