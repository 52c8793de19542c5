//! Example: Extracting shapes from an ASCII-art diagram
//!
//! This example feeds a small two-box drawing through the pipeline and
//! prints the shapes and labels it produces.

use asciagram::{DiagramBuilder, config::ProcessingConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source = "\
+--------+       +--------+
| Client |------>| Server |
+--------+       +--------+";

    let mut config = ProcessingConfig::new();
    config.set_all_corners_round(false);

    let diagram = DiagramBuilder::new(config).build(source)?;

    println!("Extracted {} shapes:", diagram.shapes().len());
    for shape in diagram.shapes() {
        let form = if shape.is_closed() { "closed" } else { "open" };
        println!(
            "  {:?} ({form}, {} points)",
            shape.kind(),
            shape.points().len()
        );
    }

    println!("\nLabels:");
    for text in diagram.texts() {
        let anchor = text.anchor();
        println!(
            "  {:?} at ({:.0}, {:.0})",
            text.text(),
            anchor.x(),
            anchor.y()
        );
    }

    Ok(())
}
