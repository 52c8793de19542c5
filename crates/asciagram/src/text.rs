//! Label extraction and placement.
//!
//! Everything that is not a boundary, arrowhead, color code or markup
//! tag is label text. Labels are grouped, measured against the cells
//! they were typed in, and aligned by comparing column positions with
//! the other labels of their group.

use asciagram_core::{
    color::Color,
    draw::{self, Shape, ShapeKind, TextObject},
};
use log::debug;

use crate::{
    diagram::{GridScale, find_smallest_shape_intersecting},
    grid::TextGrid,
};

pub(crate) fn collect_text_objects(
    grid: &TextGrid,
    scale: &GridScale,
    shapes: &[Shape],
) -> Vec<TextObject> {
    let mut work = grid.clone();
    work.remove_non_text();

    // bridge single-cell gaps so multi-word labels stay in one group
    let mut group_grid = work.clone();
    let gaps = group_grid.all_blanks_between_characters();
    group_grid.fill_cells(&gaps, '|');
    let groups = group_grid.all_non_blank().distinct_components();
    debug!(count = groups.len(); "text groups found");

    let fonts = draw::measurer();
    let base_size = fonts.size_for_height(scale.cell_height());

    let mut texts = Vec::new();
    for group in &groups {
        let mut isolation = TextGrid::blank(grid.width(), grid.height());
        isolation.copy_selected(group, &work);

        for (cell, s) in isolation.find_strings() {
            let last_cell = crate::grid::Cell::new(cell.x + s.chars().count() as i32 - 1, cell.y);
            let min_x = scale.cell_min_x(cell);
            let max_x = scale.cell_max_x(last_cell);
            let baseline = scale.cell_max_y(cell);

            let mut size = base_size;
            if fonts.width_for(&s, size) > max_x - min_x {
                size = fonts.size_for_width(&s, max_x - min_x, size);
            }

            let mut text = TextObject::new(s.clone(), min_x, baseline, size);
            text.center_vertically_between(scale.cell_min_y(cell), scale.cell_max_y(cell));

            let width = fonts.width_for(&s, size);
            let other_start = isolation.other_strings_start_in_same_column(cell);
            let other_end = isolation.other_strings_end_in_same_column(last_cell);
            if other_start == 0 && other_end == 0 {
                text.center_horizontally_between(min_x, max_x, width);
            } else if other_end > 0 && other_start == 0 {
                text.align_right_edge_to(max_x, width);
            } else if other_end > 0 && other_start > 0 {
                if other_end > other_start {
                    text.align_right_edge_to(max_x, width);
                } else if other_end == other_start {
                    text.center_horizontally_between(min_x, max_x, width);
                }
            }
            texts.push(text);
        }
    }

    // labels over dark fills switch to white
    for text in &mut texts {
        let measured = fonts.measure(text.text(), text.font_size());
        let bounds = text.bounds(measured.width(), measured.height());
        if let Some(index) = find_smallest_shape_intersecting(shapes, bounds) {
            if let Some(fill) = shapes[index].fill_color() {
                if fill.is_dark() {
                    text.set_color(Color::white());
                }
            }
        }
    }

    // labels over custom artwork get an outline so they stay readable
    for text in &mut texts {
        let measured = fonts.measure(text.text(), text.font_size());
        let bounds = text.bounds(measured.width(), measured.height());
        let over_custom = shapes.iter().any(|shape| {
            shape.kind() == ShapeKind::Custom
                && shape
                    .bounds()
                    .is_some_and(|shape_bounds| shape_bounds.intersects(bounds))
        });
        if over_custom {
            text.set_outline(true);
            text.set_color(Color::default());
        }
    }

    texts
}
