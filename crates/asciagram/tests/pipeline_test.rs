//! End-to-end tests for the extraction pipeline.

use asciagram::{
    DiagramBuilder,
    config::ProcessingConfig,
    draw::{CustomShapeDefinition, Shape, ShapeKind},
};
use float_cmp::assert_approx_eq;

fn build(source: &str) -> asciagram::Diagram {
    DiagramBuilder::default()
        .build(source)
        .expect("diagram should build")
}

fn closed_shapes(diagram: &asciagram::Diagram) -> Vec<&Shape> {
    diagram
        .shapes()
        .iter()
        .filter(|s| s.is_closed() && s.kind() != ShapeKind::Arrowhead)
        .collect()
}

fn open_shapes(diagram: &asciagram::Diagram) -> Vec<&Shape> {
    diagram.shapes().iter().filter(|s| !s.is_closed()).collect()
}

#[test]
fn test_single_box() {
    let diagram = build("+---+\n|   |\n+---+");

    assert_eq!(diagram.shapes().len(), 1);
    let shape = &diagram.shapes()[0];
    assert!(shape.is_closed());
    assert!(!shape.is_dashed());
    assert_eq!(shape.points().len(), 4);

    // corners land on cell midpoints (2 cells of blank border)
    let bounds = shape.bounds().expect("box has bounds");
    assert_approx_eq!(f32, bounds.min_x(), 25.0);
    assert_approx_eq!(f32, bounds.min_y(), 35.0);
    assert_approx_eq!(f32, bounds.max_x(), 65.0);
    assert_approx_eq!(f32, bounds.max_y(), 63.0);
}

#[test]
fn test_dashed_box() {
    let diagram = build("+===+\n|   |\n+===+");
    assert_eq!(diagram.shapes().len(), 1);
    assert!(diagram.shapes()[0].is_dashed());
}

#[test]
fn test_adjacent_boxes_share_no_wall() {
    let diagram = build("+--+--+\n|  |  |\n+--+--+");

    let closed = closed_shapes(&diagram);
    assert_eq!(closed.len(), 2);

    let left = closed
        .iter()
        .min_by(|a, b| {
            let ax = a.bounds().unwrap().min_x();
            let bx = b.bounds().unwrap().min_x();
            ax.partial_cmp(&bx).unwrap()
        })
        .unwrap();
    let right = closed
        .iter()
        .max_by(|a, b| {
            let ax = a.bounds().unwrap().min_x();
            let bx = b.bounds().unwrap().min_x();
            ax.partial_cmp(&bx).unwrap()
        })
        .unwrap();

    // the shared wall at x = 55 is pulled apart by a fifth of the
    // cell width on each side
    assert_approx_eq!(f32, left.bounds().unwrap().max_x(), 53.0);
    assert_approx_eq!(f32, right.bounds().unwrap().min_x(), 57.0);
}

#[test]
fn test_line_with_arrowhead() {
    let diagram = build("---->");

    let open = open_shapes(&diagram);
    assert_eq!(open.len(), 1);
    let line = open[0];
    assert_eq!(line.points().len(), 2);
    // the west end is pushed to the cell edge, the east end is locked
    // onto the arrowhead cell
    assert_approx_eq!(f32, line.points()[0].x(), 20.0);
    assert_approx_eq!(f32, line.points()[1].x(), 65.0);
    assert!(line.points()[1].is_locked());

    let arrowheads: Vec<&Shape> = diagram
        .shapes()
        .iter()
        .filter(|s| s.kind() == ShapeKind::Arrowhead)
        .collect();
    assert_eq!(arrowheads.len(), 1);
    assert_eq!(arrowheads[0].points().len(), 3);
}

#[test]
fn test_box_with_attached_line() {
    let diagram = build("+---+\n|   |\n+-+-+\n  |");

    let closed = closed_shapes(&diagram);
    let open = open_shapes(&diagram);
    assert_eq!(closed.len(), 1);
    assert_eq!(open.len(), 1);

    // the tail connects into the junction on the box wall
    let tail = open[0];
    assert!(tail.points().iter().any(|p| p.is_locked()));
}

#[test]
fn test_branching_line_becomes_composite() {
    let diagram = build("--+--\n  |");

    assert_eq!(diagram.composites().len(), 1);
    assert_eq!(diagram.composites()[0].len(), 3);
    let open = open_shapes(&diagram);
    assert_eq!(open.len(), 3);
}

#[test]
fn test_color_code_fills_enclosing_box() {
    let diagram = build("+---------+\n| cFF0000 |\n+---------+");

    let closed = closed_shapes(&diagram);
    assert_eq!(closed.len(), 1);
    assert!(closed[0].fill_color().is_some());

    // the code itself must not become a label
    assert!(diagram.texts().iter().all(|t| !t.text().contains("cFF")));
}

#[test]
fn test_markup_tag_selects_symbol() {
    let diagram = build("+----+\n|{d} |\n+----+");

    let closed = closed_shapes(&diagram);
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].kind(), ShapeKind::Document);
}

#[test]
fn test_custom_shape_definition_wins() {
    let mut config = ProcessingConfig::new();
    config.add_custom_shape(CustomShapeDefinition::new("d"));
    let diagram = DiagramBuilder::new(config)
        .build("+----+\n|{d} |\n+----+")
        .expect("diagram should build");

    let shape = &closed_shapes(&diagram)[0];
    assert_eq!(shape.kind(), ShapeKind::Custom);
    assert_eq!(shape.definition().map(|d| d.tag()), Some("d"));
}

#[test]
fn test_point_marker_on_line() {
    let diagram = build("--*--");

    let markers: Vec<&Shape> = diagram
        .shapes()
        .iter()
        .filter(|s| s.kind() == ShapeKind::PointMarker)
        .collect();
    assert_eq!(markers.len(), 1);
    assert!(markers[0].fill_color().is_some());

    // the marker cell reads as part of the line, so one line spans it
    assert_eq!(open_shapes(&diagram).len(), 1);
}

#[test]
fn test_label_inside_box() {
    let diagram = build("+-------+\n| Hello |\n+-------+");

    assert_eq!(diagram.texts().len(), 1);
    let text = diagram.texts()[0].clone();
    assert_eq!(text.text(), "Hello");

    // the label sits inside the box outline
    let bounds = diagram.shapes()[0].bounds().unwrap();
    let anchor = text.anchor();
    assert!(anchor.x() > bounds.min_x() && anchor.x() < bounds.max_x());
    assert!(anchor.y() > bounds.min_y() && anchor.y() < bounds.max_y());
}

#[test]
fn test_rounded_corners() {
    let diagram = build("/---+\n|   |\n+---/");

    let shape = &diagram.shapes()[0];
    assert!(shape.is_closed());
    let round = shape
        .points()
        .iter()
        .filter(|p| p.kind() == asciagram::draw::PointKind::Round)
        .count();
    assert_eq!(round, 2);
}

#[test]
fn test_all_corners_round_option() {
    let mut config = ProcessingConfig::new();
    config.set_all_corners_round(true);
    let diagram = DiagramBuilder::new(config)
        .build("+---+\n|   |\n+---+")
        .expect("diagram should build");

    assert!(
        diagram.shapes()[0]
            .points()
            .iter()
            .all(|p| p.kind() == asciagram::draw::PointKind::Round)
    );
}

#[test]
fn test_processing_is_deterministic() {
    let source = "+--+--+  +---+\n|  |  |  | A |--->\n+--+--+  +---+";
    let first = build(source);
    let second = build(source);

    let points = |d: &asciagram::Diagram| -> Vec<(f32, f32)> {
        d.shapes()
            .iter()
            .flat_map(|s| s.points().iter().map(|p| (p.x(), p.y())))
            .collect()
    };
    assert_eq!(first.shapes().len(), second.shapes().len());
    assert_eq!(points(&first), points(&second));
    assert_eq!(first.texts().len(), second.texts().len());
}

#[test]
fn test_nested_boxes_both_survive() {
    let diagram = build("+-------+\n| +---+ |\n| |   | |\n| +---+ |\n+-------+");
    assert_eq!(closed_shapes(&diagram).len(), 2);
}
