//! Pulling overlapping shape edges apart.
//!
//! When two closed shapes are drawn sharing a wall, both outlines run
//! through the same coordinates. Each shape's copy of a shared edge is
//! nudged towards its own interior so the two outlines render side by
//! side instead of on top of each other.

use asciagram_core::{draw::Shape, geometry::Point};
use log::debug;

use crate::diagram::GridScale;

/// Probe distance used to decide which side of an edge is inside its
/// owning shape.
const INWARD_PROBE: f32 = 0.05;

/// An edge of a shape, identified by the owning shape's index and the
/// indices of its two vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeRef {
    shape: usize,
    a: usize,
    b: usize,
}

impl EdgeRef {
    fn endpoints(&self, shapes: &[Shape]) -> (Point, Point) {
        let points = shapes[self.shape].points();
        (points[self.a].point(), points[self.b].point())
    }
}

/// Moves every edge shared between two shapes towards its owner's
/// interior by one fifth of the smaller cell dimension.
pub(crate) fn separate_common_edges(scale: &GridScale, shapes: &mut [Shape]) {
    let offset = scale.min_cell_dimension() / 5.0;

    let mut edges: Vec<EdgeRef> = Vec::new();
    for (index, shape) in shapes.iter().enumerate() {
        let n = shape.points().len();
        if n < 2 {
            continue;
        }
        for a in 0..n - 1 {
            edges.push(EdgeRef {
                shape: index,
                a,
                b: a + 1,
            });
        }
        if shape.is_closed() {
            edges.push(EdgeRef {
                shape: index,
                a: n - 1,
                b: 0,
            });
        }
    }

    // all pairs are found before anything moves, so one move cannot
    // mask another overlap
    let mut pairs: Vec<(EdgeRef, EdgeRef)> = Vec::new();
    for i in 0..edges.len() {
        for j in i + 1..edges.len() {
            if edges[i].shape != edges[j].shape && touches(&edges[i], &edges[j], shapes) {
                pairs.push((edges[i], edges[j]));
            }
        }
    }
    if !pairs.is_empty() {
        debug!(count = pairs.len(); "separating common edges");
    }

    let mut moved: Vec<EdgeRef> = Vec::new();
    for (first, second) in pairs {
        for edge in [first, second] {
            if moved.contains(&edge) {
                continue;
            }
            move_inwards(&edge, offset, shapes);
            moved.push(edge);
        }
    }
}

/// Whether two axis-aligned edges overlap along the same line.
/// Edges that merely meet end to end do not count.
fn touches(first: &EdgeRef, second: &EdgeRef, shapes: &[Shape]) -> bool {
    let (s1, e1) = first.endpoints(shapes);
    let (s2, e2) = second.endpoints(shapes);

    if (same_point(s1, s2) && same_point(e1, e2)) || (same_point(s1, e2) && same_point(e1, s2)) {
        return true;
    }

    let h1 = s1.y() == e1.y();
    let v1 = s1.x() == e1.x();
    let h2 = s2.y() == e2.y();
    let v2 = s2.x() == e2.x();
    if (h1 && v2 && !h2) || (v1 && h2 && !v2) {
        return false;
    }
    // sloped edges do not participate
    if (!h1 && !v1) || (!h2 && !v2) {
        return false;
    }

    let d1 = if h1 { s1.y() } else { s1.x() };
    let d2 = if h2 { s2.y() } else { s2.x() };
    if d1 != d2 {
        return false;
    }

    // collapse both edges onto one axis and order them; adjacency at a
    // single shared endpoint is not an overlap
    let (a1, b1) = ordered_span(s1, e1, h1);
    let (a2, b2) = ordered_span(s2, e2, h2);
    let (first_span, second_span) = if a1 <= a2 { ((a1, b1), (a2, b2)) } else { ((a2, b2), (a1, b1)) };
    if first_span.1 == second_span.0 {
        return false;
    }

    within_span(s2, e2, h2, s1)
        || within_span(s2, e2, h2, e1)
        || within_span(s1, e1, h1, s2)
        || within_span(s1, e1, h1, e2)
}

fn same_point(a: Point, b: Point) -> bool {
    a.x() == b.x() && a.y() == b.y()
}

/// The edge's span along its own axis, low end first.
fn ordered_span(start: Point, end: Point, horizontal: bool) -> (f32, f32) {
    let (a, b) = if horizontal {
        (start.x(), end.x())
    } else {
        (start.y(), end.y())
    };
    if a <= b { (a, b) } else { (b, a) }
}

fn within_span(start: Point, end: Point, horizontal: bool, p: Point) -> bool {
    let (low, high) = ordered_span(start, end, horizontal);
    let value = if horizontal { p.x() } else { p.y() };
    low <= value && value <= high
}

/// Shifts both endpoints of the edge towards the interior of its
/// owning shape.
fn move_inwards(edge: &EdgeRef, offset: f32, shapes: &mut [Shape]) {
    let (start, end) = edge.endpoints(shapes);
    let horizontal = start.y() == end.y();
    let vertical = start.x() == end.x();
    if !horizontal && !vertical {
        return;
    }

    let mid = start.midpoint(end);
    let owner = &shapes[edge.shape];
    let (mut dx, mut dy) = (0.0, 0.0);
    if horizontal {
        if owner.contains(Point::new(mid.x(), mid.y() - INWARD_PROBE)) {
            dy = -offset;
        } else if owner.contains(Point::new(mid.x(), mid.y() + INWARD_PROBE)) {
            dy = offset;
        }
    } else if owner.contains(Point::new(mid.x() - INWARD_PROBE, mid.y())) {
        dx = -offset;
    } else if owner.contains(Point::new(mid.x() + INWARD_PROBE, mid.y())) {
        dx = offset;
    }

    let points = shapes[edge.shape].points_mut();
    for index in [edge.a, edge.b] {
        let point = &mut points[index];
        point.set_x(point.x() + dx);
        point.set_y(point.y() + dy);
    }
}

#[cfg(test)]
mod tests {
    use asciagram_core::draw::ShapePoint;
    use float_cmp::assert_approx_eq;

    use super::*;

    fn rectangle(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Shape {
        let mut shape = Shape::closed();
        shape.push(ShapePoint::new(min_x, min_y));
        shape.push(ShapePoint::new(max_x, min_y));
        shape.push(ShapePoint::new(max_x, max_y));
        shape.push(ShapePoint::new(min_x, max_y));
        shape
    }

    fn scale() -> GridScale {
        GridScale::new(10, 10, 10.0, 14.0)
    }

    #[test]
    fn test_shared_wall_moves_apart() {
        // two rectangles sharing the vertical wall at x = 20
        let mut shapes = vec![
            rectangle(0.0, 0.0, 20.0, 20.0),
            rectangle(20.0, 0.0, 40.0, 20.0),
        ];
        separate_common_edges(&scale(), &mut shapes);

        let left_wall_x = shapes[0].points()[1].x();
        let right_wall_x = shapes[1].points()[0].x();
        assert!(left_wall_x < 20.0, "left copy should move west");
        assert!(right_wall_x > 20.0, "right copy should move east");
        assert_approx_eq!(f32, 20.0 - left_wall_x, right_wall_x - 20.0);
    }

    #[test]
    fn test_disjoint_shapes_are_untouched() {
        let mut shapes = vec![
            rectangle(0.0, 0.0, 10.0, 10.0),
            rectangle(30.0, 0.0, 40.0, 10.0),
        ];
        let before: Vec<Vec<(f32, f32)>> = shapes
            .iter()
            .map(|s| s.points().iter().map(|p| (p.x(), p.y())).collect())
            .collect();
        separate_common_edges(&scale(), &mut shapes);
        let after: Vec<Vec<(f32, f32)>> = shapes
            .iter()
            .map(|s| s.points().iter().map(|p| (p.x(), p.y())).collect())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_adjacent_edges_meeting_at_corner_are_untouched() {
        // edges on the same line meeting end to end only
        let mut shapes = vec![
            rectangle(0.0, 0.0, 10.0, 10.0),
            rectangle(10.0, 10.0, 20.0, 20.0),
        ];
        let before = shapes[0].points()[1].x();
        separate_common_edges(&scale(), &mut shapes);
        assert_approx_eq!(f32, shapes[0].points()[1].x(), before);
    }

    #[test]
    fn test_partial_overlap_moves_both() {
        // the second shape's top wall overlaps half of the first's bottom wall
        let mut shapes = vec![
            rectangle(0.0, 0.0, 20.0, 10.0),
            rectangle(10.0, 10.0, 30.0, 20.0),
        ];
        separate_common_edges(&scale(), &mut shapes);
        let bottom_y = shapes[0].points()[2].y();
        let top_y = shapes[1].points()[0].y();
        assert!(bottom_y < 10.0);
        assert!(top_y > 10.0);
    }
}
