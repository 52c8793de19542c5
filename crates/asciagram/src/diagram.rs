//! The extraction pipeline: from a normalized grid to shapes and text.

use asciagram_core::{
    draw::{CompositeShape, Shape, ShapeKind, TextObject},
    geometry::{Bounds, Point},
};
use log::{debug, warn};
use serde::Serialize;

use crate::{
    config::ProcessingConfig,
    edges,
    grid::{Cell, TextGrid},
    shapes, text,
    trace::{AbstractionGrid, CellSet, SetKind},
};

/// Maps grid cells to device coordinates.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GridScale {
    cell_width: f32,
    cell_height: f32,
    width: f32,
    height: f32,
}

impl GridScale {
    pub fn new(columns: i32, rows: i32, cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
            width: columns as f32 * cell_width,
            height: rows as f32 * cell_height,
        }
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Total width of the diagram canvas.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Total height of the diagram canvas.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn min_cell_dimension(&self) -> f32 {
        self.cell_width.min(self.cell_height)
    }

    pub fn cell_min_x(&self, c: Cell) -> f32 {
        c.x as f32 * self.cell_width
    }

    pub fn cell_mid_x(&self, c: Cell) -> f32 {
        c.x as f32 * self.cell_width + self.cell_width / 2.0
    }

    pub fn cell_max_x(&self, c: Cell) -> f32 {
        (c.x + 1) as f32 * self.cell_width
    }

    pub fn cell_min_y(&self, c: Cell) -> f32 {
        c.y as f32 * self.cell_height
    }

    pub fn cell_mid_y(&self, c: Cell) -> f32 {
        c.y as f32 * self.cell_height + self.cell_height / 2.0
    }

    pub fn cell_max_y(&self, c: Cell) -> f32 {
        (c.y + 1) as f32 * self.cell_height
    }

    /// The cell containing a device-coordinate point.
    pub fn cell_for(&self, p: Point) -> Cell {
        Cell::new(
            (p.x() / self.cell_width) as i32,
            (p.y() / self.cell_height) as i32,
        )
    }

    /// The midpoint of a cell in device coordinates.
    pub fn cell_mid(&self, c: Cell) -> Point {
        Point::new(self.cell_mid_x(c), self.cell_mid_y(c))
    }
}

/// The structured result of processing a grid.
#[derive(Debug, Clone, Serialize)]
pub struct Diagram {
    scale: GridScale,
    shapes: Vec<Shape>,
    composites: Vec<CompositeShape>,
    texts: Vec<TextObject>,
}

impl Diagram {
    pub fn scale(&self) -> &GridScale {
        &self.scale
    }

    /// All extracted shapes, including composite members.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Groupings of open shapes that were traced from one boundary.
    pub fn composites(&self) -> &[CompositeShape] {
        &self.composites
    }

    pub fn texts(&self) -> &[TextObject] {
        &self.texts
    }

    /// Runs the full extraction pipeline over a loaded grid.
    pub(crate) fn build(grid: &TextGrid, config: &ProcessingConfig) -> Diagram {
        let mut work = grid.clone();
        work.replace_type_on_line();
        work.replace_point_markers_on_line();

        let boundaries = work.all_boundaries();
        let seeds = AbstractionGrid::new(&work, &boundaries).distinct_shapes();
        debug!(count = seeds.len(); "distinct boundaries found");

        let candidates = find_boundary_sets(&work, &seeds);
        let candidates = remove_duplicate_sets(candidates);
        let (mut open, mut closed, mixed) = categorize(candidates, &work);
        debug!(open = open.len(), closed = closed.len(), mixed = mixed.len();
            "boundaries categorized");

        if !mixed.is_empty() {
            let resolved = resolve_mixed(mixed, &closed, &work);
            let mut all = Vec::new();
            all.extend(open);
            all.extend(closed);
            all.extend(resolved);
            let (reopen, reclosed, leftover) = categorize(all, &work);
            open = reopen;
            closed = reclosed;
            if !leftover.is_empty() {
                warn!(count = leftover.len(); "dropping unresolvable mixed boundaries");
            }
        }

        let closed = remove_obsolete_shapes(&work, closed);

        let scale = GridScale::new(
            grid.width(),
            grid.height(),
            config.cell_width(),
            config.cell_height(),
        );
        let all_corners_round = config.all_corners_round();

        let mut arena: Vec<Shape> = Vec::new();
        for set in &closed {
            if let Some(shape) =
                shapes::closed_shape_from_boundary(&work, set, &scale, all_corners_round)
            {
                arena.push(shape);
            }
        }

        if config.separate_common_edges() {
            edges::separate_common_edges(&scale, &mut arena);
        }

        let mut composites: Vec<CompositeShape> = Vec::new();
        for set in &open {
            if set.len() == 1 {
                let Some(c) = set.first_cell() else { continue };
                if grid.cell_contains_dashed_line_char(c) {
                    continue;
                }
                if let Some(mut shape) = shapes::small_line(&work, c, &scale) {
                    shapes::connect_ends_to_anchors(&mut shape, &work, &scale);
                    arena.push(shape);
                }
            } else {
                let mut traced =
                    shapes::open_shapes_from_boundary(&work, set, &scale, all_corners_round);
                for shape in &mut traced {
                    if !shape.is_closed() {
                        shapes::connect_ends_to_anchors(shape, &work, &scale);
                    }
                }
                if traced.len() == 1 {
                    let mut shape = traced.remove(0);
                    shapes::move_ends_to_cell_edges(&mut shape, &scale);
                    arena.push(shape);
                } else if !traced.is_empty() {
                    let start = arena.len();
                    let members = (start..start + traced.len()).collect();
                    arena.extend(traced);
                    composites.push(CompositeShape::new(members));
                }
            }
        }

        for (cell, color) in grid.find_color_codes() {
            let point = scale.cell_mid(cell);
            if let Some(index) = find_smallest_shape_containing(&arena, point) {
                arena[index].set_fill_color(Some(color));
            }
        }

        for (cell, tag) in grid.find_markup_tags() {
            let point = scale.cell_mid(cell);
            let Some(index) = find_smallest_shape_containing(&arena, point) else {
                continue;
            };
            apply_markup_tag(&mut arena[index], &tag, config);
        }

        for c in work.find_arrowheads() {
            match shapes::arrowhead(&work, c, &scale) {
                Some(shape) => arena.push(shape),
                None => warn!(x = c.x, y = c.y; "could not create arrowhead shape"),
            }
        }

        for c in grid.find_point_markers_on_line() {
            arena.push(shapes::point_marker(c, &scale));
        }

        let arena = remove_duplicate_shapes(arena, &mut composites);

        let texts = text::collect_text_objects(grid, &scale, &arena);

        Diagram {
            scale,
            shapes: arena,
            composites,
            texts,
        }
    }
}

/// Flood-fills around each distinct boundary at triple resolution,
/// collecting the boundary set around every region.
fn find_boundary_sets(work: &TextGrid, seeds: &[CellSet]) -> Vec<CellSet> {
    let (width, height) = (work.width(), work.height());
    let mut sets = Vec::new();
    for cells in seeds {
        // the fill buffer tracks which regions were seen already
        let mut fill_buffer = TextGrid::blank(3 * width, 3 * height);
        for y in 0..3 * height {
            for x in 0..3 * width {
                if !fill_buffer.is_blank_or_missing(Cell::new(x, y)) {
                    continue;
                }
                let mut copy = AbstractionGrid::new(work, cells).into_grid();
                let found = copy.find_boundaries_expanding_from(Cell::new(x, y));
                if found.is_empty() {
                    continue;
                }
                sets.push(found.scaled_one_third());

                let mut copy = AbstractionGrid::new(work, cells).into_grid();
                let filled = copy.fill_continuous_area(Cell::new(x, y), '*');
                fill_buffer.fill_cells(&filled, '*');
                fill_buffer.fill_cells(&found, '-');
            }
        }
    }
    sets
}

fn remove_duplicate_sets(sets: Vec<CellSet>) -> Vec<CellSet> {
    let mut distinct: Vec<CellSet> = Vec::new();
    for set in sets {
        if !distinct.contains(&set) {
            distinct.push(set);
        }
    }
    distinct
}

fn categorize(sets: Vec<CellSet>, work: &TextGrid) -> (Vec<CellSet>, Vec<CellSet>, Vec<CellSet>) {
    let mut open = Vec::new();
    let mut closed = Vec::new();
    let mut mixed = Vec::new();
    for set in sets {
        match set.kind(work) {
            SetKind::Open => open.push(set),
            SetKind::Closed => closed.push(set),
            SetKind::Mixed | SetKind::HasClosedArea => mixed.push(set),
            SetKind::Undetermined => {
                warn!("dropping undetermined boundary set");
            }
        }
    }
    (open, closed, mixed)
}

/// Splits mixed boundary sets into open and closed parts. When closed
/// sets exist they are subtracted from each mixed set; otherwise the
/// mixed set is broken apart by walking from its line ends.
fn resolve_mixed(mixed: Vec<CellSet>, closed: &[CellSet], work: &TextGrid) -> Vec<CellSet> {
    let mut resolved = Vec::new();
    if closed.is_empty() {
        for set in mixed {
            resolved.extend(set.break_truly_mixed(work));
        }
        return resolved;
    }
    for mut set in mixed {
        for closed_set in closed {
            set.subtract(closed_set);
        }
        if set.kind(work) == SetKind::Open {
            // subtraction can leave several distinct open sets
            resolved.extend(AbstractionGrid::new(work, &set).distinct_shapes());
        } else {
            resolved.push(set);
        }
    }
    resolved
}

/// Removes closed boundary sets that only duplicate the outline of a
/// group of smaller sets, like the outer boundary around a row of
/// adjacent boxes.
fn remove_obsolete_shapes(work: &TextGrid, sets: Vec<CellSet>) -> Vec<CellSet> {
    let mut filled: Vec<CellSet> = Vec::with_capacity(sets.len());
    for set in &sets {
        match filled_equivalent(set, work) {
            Some(equivalent) => filled.push(equivalent),
            // when a set cannot be filled there is no reliable way to
            // compare coverage, so keep everything
            None => return sets,
        }
    }

    let mut to_remove: Vec<usize> = Vec::new();
    for index in 0..filled.len() {
        let overlapping: Vec<usize> = (0..filled.len())
            .filter(|&other| other != index && filled[index].has_common_cells(&filled[other]))
            .collect();
        // a plain pair of overlapping sets is legitimate nesting
        if overlapping.len() == 1 {
            continue;
        }
        if overlapping.is_empty() {
            continue;
        }

        let mut largest = index;
        for &other in &overlapping {
            if filled[other].len() > filled[largest].len() {
                largest = other;
            }
        }

        let Some((_, max)) = filled[largest].bounds() else {
            continue;
        };
        let mut plot_smalls = TextGrid::blank(max.x + 2, max.y + 2);
        let mut plot_largest = TextGrid::blank(max.x + 2, max.y + 2);
        for &other in overlapping.iter().chain(std::iter::once(&index)) {
            if other != largest {
                plot_smalls.fill_cells(&filled[other], '*');
            }
        }
        plot_largest.fill_cells(&filled[largest], '*');

        if plot_smalls == plot_largest && !to_remove.contains(&largest) {
            debug!(index = largest; "removing obsolete outer boundary");
            to_remove.push(largest);
        }
    }

    sets.into_iter()
        .enumerate()
        .filter(|(index, _)| !to_remove.contains(index))
        .map(|(_, set)| set)
        .collect()
}

/// The set plus its enclosed interior. Open sets are their own filled
/// equivalent; closed sets are filled by marking everything that is
/// not reachable from outside their outline.
fn filled_equivalent(set: &CellSet, work: &TextGrid) -> Option<CellSet> {
    if set.kind(work) == SetKind::Open {
        return Some(set.clone());
    }
    let (min, max) = set.bounds()?;
    if min.x <= 0 || min.y <= 0 {
        return None;
    }
    let mut plot = TextGrid::blank(max.x + 2, max.y + 2);
    for c in set.iter() {
        plot.set(c, '*');
    }
    plot.fill_continuous_area(Cell::new(0, 0), '#');

    let mut filled = CellSet::new();
    for y in 0..plot.height() {
        for x in 0..plot.width() {
            let c = Cell::new(x, y);
            if plot.get(c) != Some('#') {
                filled.add(c);
            }
        }
    }
    Some(filled)
}

/// The index of the smallest closed shape containing `point`.
pub(crate) fn find_smallest_shape_containing(shapes: &[Shape], point: Point) -> Option<usize> {
    let mut smallest: Option<usize> = None;
    for (index, shape) in shapes.iter().enumerate() {
        if !shape.contains(point) {
            continue;
        }
        match smallest {
            Some(current) if !shape.is_smaller_than(&shapes[current]) => {}
            _ => smallest = Some(index),
        }
    }
    smallest
}

/// The index of the smallest closed shape whose bounds intersect
/// `bounds`.
pub(crate) fn find_smallest_shape_intersecting(shapes: &[Shape], bounds: Bounds) -> Option<usize> {
    let mut smallest: Option<usize> = None;
    for (index, shape) in shapes.iter().enumerate() {
        if !shape.is_closed() {
            continue;
        }
        let Some(shape_bounds) = shape.bounds() else {
            continue;
        };
        if !shape_bounds.intersects(bounds) {
            continue;
        }
        match smallest {
            Some(current) if !shape.is_smaller_than(&shapes[current]) => {}
            _ => smallest = Some(index),
        }
    }
    smallest
}

/// Tags recognized as flowchart symbols, with the kind they select.
const MARKUP_TAGS: [(&str, ShapeKind); 7] = [
    ("d", ShapeKind::Document),
    ("s", ShapeKind::Storage),
    ("io", ShapeKind::Io),
    ("c", ShapeKind::Decision),
    ("mo", ShapeKind::ManualOperation),
    ("tr", ShapeKind::Trapezoid),
    ("o", ShapeKind::Ellipse),
];

/// Applies a markup tag to a shape. A configured custom definition
/// wins over the built-in symbol of the same tag; unrecognized tags
/// always resolve to custom shapes.
fn apply_markup_tag(shape: &mut Shape, tag: &str, config: &ProcessingConfig) {
    if let Some(definition) = config.custom_shape(tag) {
        shape.set_kind(ShapeKind::Custom);
        shape.set_definition(Some(definition.clone()));
        return;
    }
    match MARKUP_TAGS.iter().find(|(name, _)| *name == tag) {
        Some((_, kind)) => shape.set_kind(*kind),
        None => {
            debug!(tag; "markup tag has no definition");
            shape.set_kind(ShapeKind::Custom);
        }
    }
}

/// Drops shapes with the same outline as an earlier shape. Composite
/// members are never deduplicated; their indices are remapped to the
/// compacted arena.
fn remove_duplicate_shapes(shapes: Vec<Shape>, composites: &mut [CompositeShape]) -> Vec<Shape> {
    let member_indices: std::collections::HashSet<usize> = composites
        .iter()
        .flat_map(|composite| composite.members().iter().copied())
        .collect();

    let mut kept: Vec<Shape> = Vec::new();
    let mut kept_is_member: Vec<bool> = Vec::new();
    let mut remap: Vec<Option<usize>> = Vec::with_capacity(shapes.len());
    for (index, shape) in shapes.into_iter().enumerate() {
        let is_member = member_indices.contains(&index);
        let duplicate = !is_member
            && kept
                .iter()
                .zip(kept_is_member.iter())
                .any(|(other, &other_member)| !other_member && shape.same_outline(other));
        if duplicate {
            remap.push(None);
            continue;
        }
        remap.push(Some(kept.len()));
        kept.push(shape);
        kept_is_member.push(is_member);
    }

    for composite in composites.iter_mut() {
        *composite = CompositeShape::new(
            composite
                .members()
                .iter()
                .filter_map(|&member| remap.get(member).copied().flatten())
                .collect(),
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use asciagram_core::draw::ShapePoint;

    use super::*;
    use crate::DiagramBuilder;

    fn rectangle(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Shape {
        let mut shape = Shape::closed();
        shape.push(ShapePoint::new(min_x, min_y));
        shape.push(ShapePoint::new(max_x, min_y));
        shape.push(ShapePoint::new(max_x, max_y));
        shape.push(ShapePoint::new(min_x, max_y));
        shape
    }

    #[test]
    fn test_grid_scale_cells() {
        let scale = GridScale::new(10, 10, 10.0, 14.0);
        let c = Cell::new(3, 2);
        assert_eq!(scale.cell_min_x(c), 30.0);
        assert_eq!(scale.cell_mid_x(c), 35.0);
        assert_eq!(scale.cell_max_x(c), 40.0);
        assert_eq!(scale.cell_min_y(c), 28.0);
        assert_eq!(scale.cell_mid_y(c), 35.0);
        assert_eq!(scale.cell_max_y(c), 42.0);
        assert_eq!(scale.cell_for(Point::new(35.0, 35.0)), c);
        assert_eq!(scale.width(), 100.0);
        assert_eq!(scale.height(), 140.0);
    }

    #[test]
    fn test_remove_duplicate_sets_is_idempotent() {
        let set_a: CellSet = [Cell::new(0, 0), Cell::new(1, 0)].into_iter().collect();
        let set_b: CellSet = [Cell::new(5, 5)].into_iter().collect();
        let once = remove_duplicate_sets(vec![set_a.clone(), set_b.clone(), set_a.clone()]);
        assert_eq!(once.len(), 2);
        let twice = remove_duplicate_sets(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_find_smallest_shape_containing() {
        let shapes = vec![
            rectangle(0.0, 0.0, 100.0, 100.0),
            rectangle(10.0, 10.0, 30.0, 30.0),
        ];
        assert_eq!(
            find_smallest_shape_containing(&shapes, Point::new(20.0, 20.0)),
            Some(1)
        );
        assert_eq!(
            find_smallest_shape_containing(&shapes, Point::new(80.0, 80.0)),
            Some(0)
        );
        assert_eq!(
            find_smallest_shape_containing(&shapes, Point::new(200.0, 80.0)),
            None
        );
    }

    #[test]
    fn test_remove_duplicate_shapes_keeps_composite_members() {
        let shapes = vec![
            rectangle(0.0, 0.0, 10.0, 10.0),
            rectangle(0.0, 0.0, 10.0, 10.0),
            rectangle(0.0, 0.0, 10.0, 10.0),
        ];
        let mut composites = vec![CompositeShape::new(vec![2])];
        let kept = remove_duplicate_shapes(shapes, &mut composites);
        assert_eq!(kept.len(), 2);
        assert_eq!(composites[0].members(), &[1]);
    }

    #[test]
    fn test_apply_markup_tag_builtin_and_custom() {
        let mut config = ProcessingConfig::new();
        let mut shape = rectangle(0.0, 0.0, 10.0, 10.0);
        apply_markup_tag(&mut shape, "d", &config);
        assert_eq!(shape.kind(), ShapeKind::Document);

        config.add_custom_shape(asciagram_core::draw::CustomShapeDefinition::new("d"));
        apply_markup_tag(&mut shape, "d", &config);
        assert_eq!(shape.kind(), ShapeKind::Custom);
        assert!(shape.definition().is_some());

        let mut other = rectangle(0.0, 0.0, 10.0, 10.0);
        apply_markup_tag(&mut other, "mystery", &config);
        assert_eq!(other.kind(), ShapeKind::Custom);
    }

    #[test]
    fn test_single_box_pipeline() {
        let diagram = DiagramBuilder::default()
            .build("+---+\n|   |\n+---+")
            .expect("diagram should build");
        assert_eq!(diagram.shapes().len(), 1);
        let shape = &diagram.shapes()[0];
        assert!(shape.is_closed());
        assert_eq!(shape.points().len(), 4);
        assert!(diagram.composites().is_empty());
    }

    #[test]
    fn test_obsolete_outer_boundary_is_removed() {
        // two boxes sharing a wall also produce the outer outline of
        // their union, which must not survive
        let diagram = DiagramBuilder::default()
            .build("+---+---+\n|   |   |\n+---+---+")
            .expect("diagram should build");
        let closed: Vec<&Shape> = diagram
            .shapes()
            .iter()
            .filter(|s| s.is_closed() && s.kind() == ShapeKind::Simple)
            .collect();
        assert_eq!(closed.len(), 2);
    }
}
