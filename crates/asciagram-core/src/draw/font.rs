//! Text measurement for label layout.
//!
//! Labels extracted from the grid have to fit the cell rows they were
//! typed in. The [`FontMeasurer`] shapes text with `cosmic-text` to get
//! real glyph advances, and derives font sizes that fit a target cell
//! height or shrink to a maximum width. It maintains a reusable
//! `FontSystem` instance to avoid expensive recreation.

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::geometry::Size;

/// Ratio of line height to font size used for all measurements.
const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Labels are never shrunk below this size.
const MIN_FONT_SIZE: f32 = 4.0;

static FONT_MEASURER: OnceLock<FontMeasurer> = OnceLock::new();

/// Returns the process-wide measurer, initializing it on first use.
pub fn measurer() -> &'static FontMeasurer {
    FONT_MEASURER.get_or_init(FontMeasurer::new)
}

pub struct FontMeasurer {
    font_system: Mutex<FontSystem>,
}

impl FontMeasurer {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Measures the rendered size of a single line of text.
    ///
    /// Falls back to an advance-width estimate when no font is available
    /// for shaping.
    pub fn measure(&self, text: &str, font_size: f32) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self.font_system.lock().expect("failed to lock FontSystem");

        let metrics = Metrics::new(font_size, font_size * LINE_HEIGHT_FACTOR);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Monospace);
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if !layout_runs.is_empty() {
            for last in layout_runs.iter().map(|run| run.glyphs.last()) {
                if let Some(last) = last {
                    max_width = max_width.max(last.x + last.w);
                }
                total_height += metrics.line_height;
            }
        } else {
            max_width = text.len() as f32 * (font_size * 0.55);
            total_height = metrics.line_height;
        }

        Size::new(max_width, total_height)
    }

    /// Width of a single line of text at the given font size.
    pub fn width_for(&self, text: &str, font_size: f32) -> f32 {
        self.measure(text, font_size).width()
    }

    /// Line-box height at the given font size.
    pub fn height_for(&self, font_size: f32) -> f32 {
        font_size * LINE_HEIGHT_FACTOR
    }

    /// Largest font size whose line box fits within `target_height`.
    pub fn size_for_height(&self, target_height: f32) -> f32 {
        (target_height / LINE_HEIGHT_FACTOR).max(MIN_FONT_SIZE)
    }

    /// Shrinks `start_size` until `text` fits within `max_width`.
    pub fn size_for_width(&self, text: &str, max_width: f32, start_size: f32) -> f32 {
        let mut size = start_size;
        while size > MIN_FONT_SIZE && self.width_for(text, size) > max_width {
            size -= 0.5;
        }
        size.max(MIN_FONT_SIZE)
    }
}
