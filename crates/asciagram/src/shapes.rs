//! Turning traced cell sets into drawable shapes.

use asciagram_core::{
    color::Color,
    draw::{PointKind, Shape, ShapeKind, ShapePoint},
    geometry::Point,
};
use log::debug;

use crate::{
    diagram::GridScale,
    grid::{Cell, TextGrid},
    trace::CellSet,
};

/// The vertex a cell contributes to a shape, at the cell's midpoint.
/// Corners drawn with `/` or `\` become round vertices, and every
/// corner does when `all_corners_round` is set.
pub(crate) fn point_for_cell(
    c: Cell,
    grid: &TextGrid,
    scale: &GridScale,
    all_corners_round: bool,
) -> ShapePoint {
    let kind = if grid.is_corner(c) && all_corners_round {
        PointKind::Round
    } else if grid.is_round_corner(c) {
        PointKind::Round
    } else {
        PointKind::Normal
    };
    ShapePoint::with_kind(scale.cell_mid_x(c), scale.cell_mid_y(c), kind)
}

/// Walks a closed boundary and returns the polygon through its
/// corners. The shape is dashed if any of its cells holds a dashed
/// line character. Returns `None` when the walk cannot complete.
pub(crate) fn closed_shape_from_boundary(
    grid: &TextGrid,
    cells: &CellSet,
    scale: &GridScale,
    all_corners_round: bool,
) -> Option<Shape> {
    if cells.len() < 2 {
        return None;
    }
    let mut shape = Shape::closed();
    if cells
        .iter()
        .any(|c| grid.cell_contains_dashed_line_char(c))
    {
        shape.set_dashed(true);
    }

    let mut work = TextGrid::blank(grid.width(), grid.height());
    work.copy_selected(cells, grid);

    let start = cells.first_cell()?;
    if work.is_corner(start) {
        shape.push(point_for_cell(start, &work, scale, all_corners_round));
    }
    let mut prev = start;
    let mut cell = work.follow_cell(start, None).first_cell()?;
    if work.is_corner(cell) {
        shape.push(point_for_cell(cell, &work, scale, all_corners_round));
    }

    let mut steps = 0;
    while cell != start {
        steps += 1;
        if steps > cells.len() {
            debug!(x = start.x, y = start.y; "closed boundary did not loop");
            return None;
        }
        let nexts = work.follow_cell(cell, Some(prev));
        let next = nexts.first_cell()?;
        if nexts.len() > 1 {
            debug!(x = cell.x, y = cell.y; "closed boundary branches");
            return None;
        }
        prev = cell;
        cell = next;
        if cell != start && work.is_corner(cell) {
            shape.push(point_for_cell(cell, &work, scale, all_corners_round));
        }
    }
    Some(shape)
}

/// Traces the open polylines of a boundary set, splitting at
/// branches. If any traced segment crossed a dashed character, all
/// resulting shapes are dashed.
pub(crate) fn open_shapes_from_boundary(
    grid: &TextGrid,
    cells: &CellSet,
    scale: &GridScale,
    all_corners_round: bool,
) -> Vec<Shape> {
    let mut work = TextGrid::blank(grid.width(), grid.height());
    work.copy_selected(cells, grid);

    let mut shapes = Vec::new();
    let Some(start) = cells
        .sorted_cells()
        .into_iter()
        .find(|c| work.is_lines_end(*c))
    else {
        debug!("open boundary set has no line end");
        return shapes;
    };
    let Some(first) = work.follow_cell(start, None).first_cell() else {
        return shapes;
    };

    let mut visited = CellSet::new();
    grow_edges(
        &work,
        scale,
        all_corners_round,
        start,
        first,
        &mut visited,
        &mut shapes,
    );

    if shapes.iter().any(Shape::is_dashed) {
        for shape in &mut shapes {
            shape.set_dashed(true);
        }
    }
    shapes
}

/// Walks from `from` into `into` until a dead end or a branch,
/// collecting vertices along the way. Branches recurse into each
/// unvisited continuation.
fn grow_edges(
    work: &TextGrid,
    scale: &GridScale,
    all_corners_round: bool,
    from: Cell,
    into: Cell,
    visited: &mut CellSet,
    out: &mut Vec<Shape>,
) {
    let mut shape = Shape::open();
    let mut dashed = work.cell_contains_dashed_line_char(from);
    shape.push(point_for_cell(from, work, scale, all_corners_round));
    visited.add(from);

    let mut prev = from;
    let mut cell = into;
    loop {
        visited.add(cell);
        if work.cell_contains_dashed_line_char(cell) {
            dashed = true;
        }
        let nexts: Vec<Cell> = work
            .follow_cell(cell, Some(prev))
            .sorted_cells()
            .into_iter()
            .filter(|n| !visited.contains(*n))
            .collect();
        match nexts.len() {
            0 => {
                shape.push(point_for_cell(cell, work, scale, all_corners_round));
                finish_edge(shape, dashed, out);
                return;
            }
            1 => {
                if work.is_point_cell(cell) {
                    shape.push(point_for_cell(cell, work, scale, all_corners_round));
                }
                prev = cell;
                cell = nexts[0];
            }
            _ => {
                shape.push(point_for_cell(cell, work, scale, all_corners_round));
                finish_edge(shape, dashed, out);
                for n in nexts {
                    if !visited.contains(n) {
                        grow_edges(work, scale, all_corners_round, cell, n, visited, out);
                    }
                }
                return;
            }
        }
    }
}

fn finish_edge(mut shape: Shape, dashed: bool, out: &mut Vec<Shape>) {
    shape.set_dashed(dashed);
    if shape.points().len() >= 2 {
        out.push(shape);
    }
}

/// The line for a boundary set of a single cell, spanning the cell in
/// the direction of its character.
pub(crate) fn small_line(grid: &TextGrid, c: Cell, scale: &GridScale) -> Option<Shape> {
    let mut shape = Shape::open();
    if grid.is_horizontal_line(c) {
        shape.push(ShapePoint::new(scale.cell_min_x(c), scale.cell_mid_y(c)));
        shape.push(ShapePoint::new(scale.cell_max_x(c), scale.cell_mid_y(c)));
    } else if grid.is_vertical_line(c) {
        shape.push(ShapePoint::new(scale.cell_mid_x(c), scale.cell_min_y(c)));
        shape.push(ShapePoint::new(scale.cell_mid_x(c), scale.cell_max_y(c)));
    } else {
        return None;
    }
    Some(shape)
}

/// Extends the dangling ends of an open shape into an adjacent
/// arrowhead, corner or intersection cell, locking any end it moves.
pub(crate) fn connect_ends_to_anchors(shape: &mut Shape, grid: &TextGrid, scale: &GridScale) {
    if shape.is_closed() || shape.points().len() < 2 {
        return;
    }
    let last = shape.points().len() - 1;
    for (end_index, next_index) in [(0, 1), (last, last - 1)] {
        let end = shape.points()[end_index];
        let next = shape.points()[next_index];
        // probe one cell beyond the end, away from its neighbor
        let probe = if next.y() < end.y() {
            Point::new(end.x(), end.y() + scale.cell_height())
        } else if next.y() > end.y() {
            Point::new(end.x(), end.y() - scale.cell_height())
        } else if next.x() < end.x() {
            Point::new(end.x() + scale.cell_width(), end.y())
        } else if next.x() > end.x() {
            Point::new(end.x() - scale.cell_width(), end.y())
        } else {
            continue;
        };
        let anchor = scale.cell_for(probe);
        if grid.is_arrowhead(anchor) || grid.is_corner(anchor) || grid.is_intersection(anchor) {
            let point = &mut shape.points_mut()[end_index];
            point.set_x(scale.cell_mid_x(anchor));
            point.set_y(scale.cell_mid_y(anchor));
            point.lock();
        }
    }
}

/// Pushes the unlocked ends of an open line out to the edge of their
/// cells, so lines span their full extent.
pub(crate) fn move_ends_to_cell_edges(shape: &mut Shape, scale: &GridScale) {
    if shape.is_closed() || shape.points().len() < 2 {
        return;
    }
    let last = shape.points().len() - 1;
    for (end_index, next_index) in [(0, 1), (last, last - 1)] {
        let end = shape.points()[end_index];
        if end.is_locked() {
            continue;
        }
        let next = shape.points()[next_index];
        let cell = scale.cell_for(end.point());
        let point = &mut shape.points_mut()[end_index];
        if next.y() < end.y() {
            point.set_y(scale.cell_max_y(cell));
        } else if next.y() > end.y() {
            point.set_y(scale.cell_min_y(cell));
        } else if next.x() < end.x() {
            point.set_x(scale.cell_max_x(cell));
        } else if next.x() > end.x() {
            point.set_x(scale.cell_min_x(cell));
        }
    }
}

/// The triangle for an arrowhead cell, or `None` when the character's
/// orientation does not match its surroundings.
pub(crate) fn arrowhead(grid: &TextGrid, c: Cell, scale: &GridScale) -> Option<Shape> {
    let ch = grid.get(c)?;
    let (min_x, min_y) = (scale.cell_min_x(c), scale.cell_min_y(c));
    let (max_x, max_y) = (scale.cell_max_x(c), scale.cell_max_y(c));
    let (mid_x, mid_y) = (scale.cell_mid_x(c), scale.cell_mid_y(c));

    let points = match ch {
        '>' if grid.is_horizontal_line(c.west()) => {
            [(max_x, mid_y), (min_x, min_y), (min_x, max_y)]
        }
        '<' if grid.is_horizontal_line(c.east()) => {
            [(min_x, mid_y), (max_x, min_y), (max_x, max_y)]
        }
        '^' if grid.is_vertical_line(c.south()) => [(mid_x, min_y), (min_x, max_y), (max_x, max_y)],
        'v' | 'V' if grid.is_vertical_line(c.north()) => {
            [(mid_x, max_y), (min_x, min_y), (max_x, min_y)]
        }
        _ => return None,
    };

    let mut shape = Shape::closed();
    shape.set_kind(ShapeKind::Arrowhead);
    for (x, y) in points {
        shape.push(ShapePoint::new(x, y));
    }
    Some(shape)
}

/// The dot for a point marker cell, filled white by default.
pub(crate) fn point_marker(c: Cell, scale: &GridScale) -> Shape {
    let mut shape = Shape::closed();
    shape.set_kind(ShapeKind::PointMarker);
    shape.set_fill_color(Some(Color::white()));
    shape.push(ShapePoint::new(scale.cell_mid_x(c), scale.cell_mid_y(c)));
    shape
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn grid(source: &str) -> TextGrid {
        TextGrid::from_source(source, 8)
    }

    fn scale_for(g: &TextGrid) -> GridScale {
        GridScale::new(g.width(), g.height(), 10.0, 14.0)
    }

    #[test]
    fn test_closed_shape_has_corner_points_only() {
        let g = grid("+---+\n|   |\n+---+");
        let scale = scale_for(&g);
        let shape = closed_shape_from_boundary(&g, &g.all_boundaries(), &scale, false)
            .expect("boundary should close");
        assert!(shape.is_closed());
        assert_eq!(shape.points().len(), 4);
        assert!(
            shape
                .points()
                .iter()
                .all(|p| p.kind() == PointKind::Normal)
        );
    }

    #[test]
    fn test_closed_shape_round_corners() {
        let g = grid("/---+\n|   |\n+---+");
        let scale = scale_for(&g);
        let shape = closed_shape_from_boundary(&g, &g.all_boundaries(), &scale, false)
            .expect("boundary should close");
        let round = shape
            .points()
            .iter()
            .filter(|p| p.kind() == PointKind::Round)
            .count();
        assert_eq!(round, 1);
    }

    #[test]
    fn test_open_shape_from_straight_line() {
        let g = grid("-----");
        let scale = scale_for(&g);
        let shapes = open_shapes_from_boundary(&g, &g.all_boundaries(), &scale, false);
        assert_eq!(shapes.len(), 1);
        assert!(!shapes[0].is_closed());
        assert_eq!(shapes[0].points().len(), 2);
    }

    #[test]
    fn test_open_shape_with_corner_has_vertex() {
        let g = grid("--+\n  |");
        let scale = scale_for(&g);
        let shapes = open_shapes_from_boundary(&g, &g.all_boundaries(), &scale, false);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].points().len(), 3);
    }

    #[test]
    fn test_dashed_segment_infects_all() {
        let g = grid("--+\n  :");
        let scale = scale_for(&g);
        let shapes = open_shapes_from_boundary(&g, &g.all_boundaries(), &scale, false);
        assert!(shapes.iter().all(Shape::is_dashed));
    }

    #[test]
    fn test_small_line_spans_cell() {
        let g = grid("-");
        let scale = scale_for(&g);
        let c = Cell::new(2, 2);
        let shape = small_line(&g, c, &scale).expect("dash is a small line");
        assert_approx_eq!(f32, shape.points()[0].x(), scale.cell_min_x(c));
        assert_approx_eq!(f32, shape.points()[1].x(), scale.cell_max_x(c));
        assert!(small_line(&g, Cell::new(0, 0), &scale).is_none());
    }

    #[test]
    fn test_arrowhead_east() {
        let g = grid("-->");
        let scale = scale_for(&g);
        let c = Cell::new(4, 2);
        let shape = arrowhead(&g, c, &scale).expect("arrowhead should build");
        assert_eq!(shape.kind(), ShapeKind::Arrowhead);
        assert_eq!(shape.points().len(), 3);
        assert_approx_eq!(f32, shape.points()[0].x(), scale.cell_max_x(c));
        assert_approx_eq!(f32, shape.points()[0].y(), scale.cell_mid_y(c));
    }

    #[test]
    fn test_arrowhead_without_line_fails() {
        let g = grid(" > ");
        let scale = scale_for(&g);
        assert!(arrowhead(&g, Cell::new(3, 2), &scale).is_none());
    }

    #[test]
    fn test_connect_ends_to_arrowhead() {
        let g = grid("--->");
        let scale = scale_for(&g);
        let mut shape = Shape::open();
        shape.push(ShapePoint::new(
            scale.cell_mid_x(Cell::new(2, 2)),
            scale.cell_mid_y(Cell::new(2, 2)),
        ));
        shape.push(ShapePoint::new(
            scale.cell_mid_x(Cell::new(4, 2)),
            scale.cell_mid_y(Cell::new(4, 2)),
        ));
        connect_ends_to_anchors(&mut shape, &g, &scale);
        let end = shape.points()[1];
        assert!(end.is_locked());
        assert_approx_eq!(f32, end.x(), scale.cell_mid_x(Cell::new(5, 2)));
    }

    #[test]
    fn test_move_ends_to_cell_edges() {
        let g = grid("---");
        let scale = scale_for(&g);
        let mut shape = Shape::open();
        shape.push(ShapePoint::new(
            scale.cell_mid_x(Cell::new(2, 2)),
            scale.cell_mid_y(Cell::new(2, 2)),
        ));
        shape.push(ShapePoint::new(
            scale.cell_mid_x(Cell::new(4, 2)),
            scale.cell_mid_y(Cell::new(4, 2)),
        ));
        move_ends_to_cell_edges(&mut shape, &scale);
        assert_approx_eq!(f32, shape.points()[0].x(), scale.cell_min_x(Cell::new(2, 2)));
        assert_approx_eq!(f32, shape.points()[1].x(), scale.cell_max_x(Cell::new(4, 2)));
    }
}
