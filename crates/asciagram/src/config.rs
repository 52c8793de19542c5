//! Processing options.

use std::collections::HashMap;

use asciagram_core::draw::CustomShapeDefinition;
use serde::Deserialize;

/// Controls how source text is interpreted and scaled.
///
/// All fields have sensible defaults, so the struct can be built with
/// [`ProcessingConfig::new`] and adjusted through setters, or
/// deserialized from a configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    all_corners_round: bool,
    separate_common_edges: bool,
    cell_width: f32,
    cell_height: f32,
    tab_size: usize,
    custom_shapes: HashMap<String, CustomShapeDefinition>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            all_corners_round: false,
            separate_common_edges: true,
            cell_width: 10.0,
            cell_height: 14.0,
            tab_size: 8,
            custom_shapes: HashMap::new(),
        }
    }
}

impl ProcessingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every corner renders round, not just those drawn with
    /// `/` and `\`.
    pub fn all_corners_round(&self) -> bool {
        self.all_corners_round
    }

    pub fn set_all_corners_round(&mut self, all_corners_round: bool) {
        self.all_corners_round = all_corners_round;
    }

    /// Whether edges shared between shapes are pulled apart.
    pub fn separate_common_edges(&self) -> bool {
        self.separate_common_edges
    }

    pub fn set_separate_common_edges(&mut self, separate_common_edges: bool) {
        self.separate_common_edges = separate_common_edges;
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    pub fn set_cell_size(&mut self, width: f32, height: f32) {
        self.cell_width = width;
        self.cell_height = height;
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    pub fn set_tab_size(&mut self, tab_size: usize) {
        self.tab_size = tab_size;
    }

    /// Registers a custom shape definition under its tag. Custom
    /// definitions take precedence over the built-in tag of the same
    /// name.
    pub fn add_custom_shape(&mut self, definition: CustomShapeDefinition) {
        self.custom_shapes
            .insert(definition.tag().to_string(), definition);
    }

    pub fn custom_shape(&self, tag: &str) -> Option<&CustomShapeDefinition> {
        self.custom_shapes.get(tag)
    }
}
