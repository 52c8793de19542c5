use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};
use serde::{Serialize, Serializer};

/// Wrapper around the `DynamicColor` type from the color crate.
///
/// This provides the convenience methods Asciagram needs: CSS string
/// parsing for configuration, RGB construction for in-grid `cXXXXXX`
/// color codes, and a relative-luminance darkness test used to flip
/// label colors to white over dark fills.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Color { color }),
            Err(err) => Err(format!("Invalid color '{color_str}': {err}")),
        }
    }

    /// Create a fully opaque `Color` from 8-bit RGB components.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        // A hex triplet is always a valid CSS color.
        match Self::new(&format!("#{r:02X}{g:02X}{b:02X}")) {
            Ok(color) => color,
            Err(_) => Self::default(),
        }
    }

    /// Opaque white.
    pub fn white() -> Self {
        Self::from_rgb8(0xFF, 0xFF, 0xFF)
    }

    /// Returns the alpha component in `0.0..=1.0`.
    pub fn alpha(&self) -> f32 {
        self.components()[3]
    }

    /// Reports whether text drawn over this color needs a light fill.
    ///
    /// Uses the Rec. 709 relative-luminance weights over the sRGB
    /// components.
    pub fn is_dark(&self) -> bool {
        let [r, g, b, _] = self.components();
        let luminance = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        luminance < 0.5
    }

    fn components(&self) -> [f32; 4] {
        self.color.to_alpha_color::<Srgb>().components
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").unwrap()
    }
}

// For compatibility with consumers that handle colors as strings
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_names() {
        assert!(Color::new("red").is_ok());
        assert!(Color::new("#336699").is_ok());
        assert!(Color::new("not a color at all").is_err());
    }

    #[test]
    fn test_from_rgb8_round_trips_through_css() {
        let color = Color::from_rgb8(0x99, 0xDD, 0x99);
        let parsed = Color::new("#99DD99").unwrap();
        assert_eq!(color, parsed);
    }

    #[test]
    fn test_is_dark() {
        assert!(Color::new("black").unwrap().is_dark());
        assert!(Color::from_rgb8(0x10, 0x10, 0x40).is_dark());
        assert!(!Color::white().is_dark());
        assert!(!Color::from_rgb8(0xFF, 0xFF, 0x33).is_dark());
    }

    #[test]
    fn test_alpha_defaults_to_opaque() {
        let color = Color::new("#EE3322").unwrap();
        assert!((color.alpha() - 1.0).abs() < f32::EPSILON);
    }
}
