//! Shape primitives: polygons and polylines in device coordinates.
//!
//! # Overview
//!
//! - [`Shape`] - An ordered run of [`ShapePoint`]s, closed (polygon) or
//!   open (polyline), with fill, dashing, and a [`ShapeKind`] tag.
//! - [`ShapePoint`] - A vertex with per-point corner styling and an end
//!   lock used during line-end correction.
//! - [`CustomShapeDefinition`] - Configuration entry backing markup tags
//!   that map to user-defined shapes.

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    geometry::{Bounds, Point},
};

/// What a shape represents, beyond its raw geometry.
///
/// Most shapes are [`Simple`](ShapeKind::Simple) polygons or polylines.
/// The remaining variants either mark synthesized decorations
/// (arrowheads, point markers) or tag a polygon for symbolic rendering
/// (flowchart document, storage, decision, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeKind {
    Simple,
    Arrowhead,
    PointMarker,
    Document,
    Storage,
    Io,
    Decision,
    ManualOperation,
    Trapezoid,
    Ellipse,
    Custom,
}

/// Corner styling for a single vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointKind {
    Normal,
    Round,
}

/// A vertex of a [`Shape`].
///
/// `locked` marks polyline ends that were snapped to an anchor and must
/// not be moved by later correction passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapePoint {
    x: f32,
    y: f32,
    kind: PointKind,
    locked: bool,
}

impl ShapePoint {
    /// Creates a normal, unlocked vertex.
    pub fn new(x: f32, y: f32) -> Self {
        Self::with_kind(x, y, PointKind::Normal)
    }

    /// Creates an unlocked vertex with the given corner styling.
    pub fn with_kind(x: f32, y: f32, kind: PointKind) -> Self {
        Self {
            x,
            y,
            kind,
            locked: false,
        }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    pub fn kind(self) -> PointKind {
        self.kind
    }

    pub fn is_locked(self) -> bool {
        self.locked
    }

    /// Returns the vertex position as a plain [`Point`].
    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Coordinate equality, ignoring styling and lock state.
    pub fn same_position(self, other: ShapePoint) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// Configuration backing a user-defined markup tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomShapeDefinition {
    tag: String,
    #[serde(default)]
    stretches: bool,
    #[serde(default)]
    drops_shadow: bool,
    #[serde(default)]
    path: Option<String>,
}

impl CustomShapeDefinition {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            stretches: false,
            drops_shadow: false,
            path: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn stretches(&self) -> bool {
        self.stretches
    }

    pub fn drops_shadow(&self) -> bool {
        self.drops_shadow
    }

    /// Path to the artwork the renderer substitutes for the polygon, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

/// A polygon or polyline extracted from the grid.
#[derive(Debug, Clone, Serialize)]
pub struct Shape {
    points: Vec<ShapePoint>,
    kind: ShapeKind,
    fill_color: Option<Color>,
    closed: bool,
    dashed: bool,
    definition: Option<CustomShapeDefinition>,
}

impl Shape {
    /// Creates an empty closed shape (a polygon under construction).
    pub fn closed() -> Self {
        Self::with_closed(true)
    }

    /// Creates an empty open shape (a polyline under construction).
    pub fn open() -> Self {
        Self::with_closed(false)
    }

    fn with_closed(closed: bool) -> Self {
        Self {
            points: Vec::new(),
            kind: ShapeKind::Simple,
            fill_color: None,
            closed,
            dashed: false,
            definition: None,
        }
    }

    pub fn push(&mut self, point: ShapePoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[ShapePoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [ShapePoint] {
        &mut self.points
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ShapeKind) {
        self.kind = kind;
    }

    pub fn fill_color(&self) -> Option<&Color> {
        self.fill_color.as_ref()
    }

    pub fn set_fill_color(&mut self, color: Option<Color>) {
        self.fill_color = color;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_dashed(&self) -> bool {
        self.dashed
    }

    pub fn set_dashed(&mut self, dashed: bool) {
        self.dashed = dashed;
    }

    pub fn definition(&self) -> Option<&CustomShapeDefinition> {
        self.definition.as_ref()
    }

    pub fn set_definition(&mut self, definition: Option<CustomShapeDefinition>) {
        self.definition = definition;
    }

    /// Axis-aligned bounding box, or `None` for an empty shape.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.points.iter().map(|p| p.point()))
    }

    /// Polygon area via the shoelace formula.
    ///
    /// Open shapes and degenerate polygons have zero area.
    pub fn area(&self) -> f32 {
        if !self.closed || self.points.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x() * b.y() - b.x() * a.y();
        }
        (sum / 2.0).abs()
    }

    pub fn is_smaller_than(&self, other: &Shape) -> bool {
        self.area() < other.area()
    }

    /// Even-odd point-in-polygon test.
    ///
    /// Open shapes contain nothing.
    pub fn contains(&self, point: Point) -> bool {
        if !self.closed || self.points.len() < 3 {
            return false;
        }
        let (px, py) = (point.x(), point.y());
        let mut inside = false;
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (self.points[i].x(), self.points[i].y());
            let (xj, yj) = (self.points[j].x(), self.points[j].y());
            if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Whether both shapes cover exactly the same vertex positions,
    /// in any order.
    pub fn same_outline(&self, other: &Shape) -> bool {
        if self.points.len() != other.points.len() {
            return false;
        }
        self.points
            .iter()
            .all(|p| other.points.iter().any(|q| p.same_position(*q)))
            && other
                .points
                .iter()
                .all(|q| self.points.iter().any(|p| q.same_position(*p)))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn rectangle(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Shape {
        let mut shape = Shape::closed();
        shape.push(ShapePoint::new(min_x, min_y));
        shape.push(ShapePoint::new(max_x, min_y));
        shape.push(ShapePoint::new(max_x, max_y));
        shape.push(ShapePoint::new(min_x, max_y));
        shape
    }

    #[test]
    fn test_rectangle_area() {
        let shape = rectangle(0.0, 0.0, 10.0, 14.0);
        assert_approx_eq!(f32, shape.area(), 140.0);
    }

    #[test]
    fn test_open_shape_has_no_area() {
        let mut shape = Shape::open();
        shape.push(ShapePoint::new(0.0, 0.0));
        shape.push(ShapePoint::new(10.0, 0.0));
        shape.push(ShapePoint::new(10.0, 10.0));
        assert_approx_eq!(f32, shape.area(), 0.0);
    }

    #[test]
    fn test_contains_interior_and_exterior() {
        let shape = rectangle(0.0, 0.0, 10.0, 10.0);
        assert!(shape.contains(Point::new(5.0, 5.0)));
        assert!(shape.contains(Point::new(0.5, 9.5)));
        assert!(!shape.contains(Point::new(-1.0, 5.0)));
        assert!(!shape.contains(Point::new(5.0, 11.0)));
    }

    #[test]
    fn test_open_shape_contains_nothing() {
        let mut shape = Shape::open();
        shape.push(ShapePoint::new(0.0, 0.0));
        shape.push(ShapePoint::new(10.0, 0.0));
        shape.push(ShapePoint::new(10.0, 10.0));
        shape.push(ShapePoint::new(0.0, 10.0));
        assert!(!shape.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_same_outline_ignores_order() {
        let a = rectangle(0.0, 0.0, 10.0, 10.0);
        let mut b = Shape::closed();
        b.push(ShapePoint::new(10.0, 10.0));
        b.push(ShapePoint::new(0.0, 10.0));
        b.push(ShapePoint::new(0.0, 0.0));
        b.push(ShapePoint::new(10.0, 0.0));
        assert!(a.same_outline(&b));

        let c = rectangle(0.0, 0.0, 10.0, 11.0);
        assert!(!a.same_outline(&c));
    }

    #[test]
    fn test_is_smaller_than() {
        let small = rectangle(0.0, 0.0, 5.0, 5.0);
        let large = rectangle(0.0, 0.0, 10.0, 10.0);
        assert!(small.is_smaller_than(&large));
        assert!(!large.is_smaller_than(&small));
    }

    #[test]
    fn test_bounds() {
        let shape = rectangle(2.0, 3.0, 12.0, 17.0);
        let bounds = shape.bounds().unwrap();
        assert_approx_eq!(f32, bounds.min_x(), 2.0);
        assert_approx_eq!(f32, bounds.max_y(), 17.0);
        assert!(Shape::closed().bounds().is_none());
    }

    fn arb_rect() -> impl Strategy<Value = (f32, f32, f32, f32)> {
        (0.0f32..100.0, 0.0f32..100.0, 1.0f32..100.0, 1.0f32..100.0)
            .prop_map(|(x, y, w, h)| (x, y, x + w, y + h))
    }

    fn check_area_is_order_independent(
        (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
    ) -> Result<(), TestCaseError> {
        let shape = rectangle(min_x, min_y, max_x, max_y);
        let mut rotated = Shape::closed();
        for point in shape
            .points()
            .iter()
            .cycle()
            .skip(2)
            .take(shape.points().len())
        {
            rotated.push(*point);
        }
        prop_assert!((shape.area() - rotated.area()).abs() < 1e-2);
        Ok(())
    }

    fn check_center_is_contained(
        (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
    ) -> Result<(), TestCaseError> {
        let shape = rectangle(min_x, min_y, max_x, max_y);
        let center = Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
        prop_assert!(shape.contains(center));
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_area_is_order_independent(rect in arb_rect()) {
            check_area_is_order_independent(rect)?;
        }

        #[test]
        fn prop_center_is_contained(rect in arb_rect()) {
            check_center_is_contained(rect)?;
        }
    }
}
