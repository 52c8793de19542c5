//! Triple-resolution redraw of boundary cells.
//!
//! Each source cell becomes a 3x3 block painted with a brush chosen
//! from the cell's classification. Boundaries that touch in the source
//! grid come apart at this resolution, so connected components of the
//! redrawn grid correspond to distinct outlines.

use super::CellSet;
use crate::grid::{Cell, TextGrid};

/// A 3x3 bitmap, one row per byte, most significant of the low three
/// bits leftmost.
#[derive(Debug, Clone, Copy)]
struct Brush([u8; 3]);

impl Brush {
    const fn new(top: u8, middle: u8, bottom: u8) -> Self {
        Self([top, middle, bottom])
    }

    fn is_set(&self, x: usize, y: usize) -> bool {
        (self.0[y] >> (2 - x)) & 1 == 1
    }
}

const HORIZONTAL_LINE: Brush = Brush::new(0b000, 0b111, 0b000);
const VERTICAL_LINE: Brush = Brush::new(0b010, 0b010, 0b010);
const CORNER1: Brush = Brush::new(0b000, 0b011, 0b010);
const CORNER2: Brush = Brush::new(0b000, 0b110, 0b010);
const CORNER3: Brush = Brush::new(0b010, 0b110, 0b000);
const CORNER4: Brush = Brush::new(0b010, 0b011, 0b000);
const T: Brush = Brush::new(0b000, 0b111, 0b010);
const INVERSE_T: Brush = Brush::new(0b010, 0b111, 0b000);
const K: Brush = Brush::new(0b010, 0b011, 0b010);
const INVERSE_K: Brush = Brush::new(0b010, 0b110, 0b010);
const CROSS: Brush = Brush::new(0b010, 0b111, 0b010);
const STAR: Brush = Brush::new(0b111, 0b111, 0b111);

fn brush_for(grid: &TextGrid, c: Cell) -> Option<Brush> {
    if grid.is_cross(c) {
        Some(CROSS)
    } else if grid.is_t(c) {
        Some(T)
    } else if grid.is_k(c) {
        Some(K)
    } else if grid.is_inverse_t(c) {
        Some(INVERSE_T)
    } else if grid.is_inverse_k(c) {
        Some(INVERSE_K)
    } else if grid.is_corner1(c) {
        Some(CORNER1)
    } else if grid.is_corner2(c) {
        Some(CORNER2)
    } else if grid.is_corner3(c) {
        Some(CORNER3)
    } else if grid.is_corner4(c) {
        Some(CORNER4)
    } else if grid.is_horizontal_line(c) {
        Some(HORIZONTAL_LINE)
    } else if grid.is_vertical_line(c) {
        Some(VERTICAL_LINE)
    } else if grid.is_cross_on_line(c) {
        Some(CROSS)
    } else if grid.is_star_on_line(c) {
        Some(STAR)
    } else {
        None
    }
}

/// The triple-resolution redraw of a set of cells.
pub struct AbstractionGrid {
    rows: Vec<Vec<char>>,
}

impl AbstractionGrid {
    /// Redraws the non-blank cells of `cells` from `grid`.
    pub fn new(grid: &TextGrid, cells: &CellSet) -> Self {
        let width = 3 * grid.width().max(0) as usize;
        let height = 3 * grid.height().max(0) as usize;
        let mut abstraction = Self {
            rows: vec![vec![' '; width]; height],
        };
        for c in cells.sorted_cells() {
            if grid.is_blank(c) {
                continue;
            }
            if let Some(brush) = brush_for(grid, c) {
                abstraction.paint(c, brush);
            }
        }
        abstraction
    }

    fn paint(&mut self, c: Cell, brush: Brush) {
        for y in 0..3 {
            for x in 0..3 {
                if brush.is_set(x, y) {
                    let row = (3 * c.y) as usize + y;
                    let col = (3 * c.x) as usize + x;
                    self.rows[row][col] = '*';
                }
            }
        }
    }

    /// The redrawn buffer as a grid, at triple resolution.
    pub fn into_grid(self) -> TextGrid {
        TextGrid::from_rows(self.rows)
    }

    /// The distinct outlines of the redraw, mapped back to source
    /// resolution.
    pub fn distinct_shapes(&self) -> Vec<CellSet> {
        let fine = TextGrid::from_rows(self.rows.clone());
        fine.all_non_blank()
            .distinct_components()
            .into_iter()
            .map(|component| component.scaled_one_third())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(source: &str) -> TextGrid {
        TextGrid::from_source(source, 8)
    }

    #[test]
    fn test_brush_bits() {
        assert!(CROSS.is_set(1, 0));
        assert!(CROSS.is_set(0, 1));
        assert!(CROSS.is_set(2, 1));
        assert!(!CROSS.is_set(0, 0));
        assert!(!CROSS.is_set(2, 2));
    }

    #[test]
    fn test_single_box_is_one_shape() {
        let g = grid("+--+\n|  |\n+--+");
        let shapes = AbstractionGrid::new(&g, &g.all_boundaries()).distinct_shapes();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].len(), g.all_boundaries().len());
    }

    #[test]
    fn test_separate_boxes_are_distinct_shapes() {
        let g = grid("+--+ +--+\n|  | |  |\n+--+ +--+");
        let shapes = AbstractionGrid::new(&g, &g.all_boundaries()).distinct_shapes();
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn test_box_with_tail_stays_connected() {
        let g = grid("+--+\n|  |\n+-++\n  |");
        let shapes = AbstractionGrid::new(&g, &g.all_boundaries()).distinct_shapes();
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn test_redraw_keeps_lines_connected() {
        let g = grid("----");
        let fine = AbstractionGrid::new(&g, &g.all_boundaries()).into_grid();
        let components = fine.all_non_blank().distinct_components();
        assert_eq!(components.len(), 1);
    }
}
