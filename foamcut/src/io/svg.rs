use itertools::Itertools;
use log::debug;
use svg::Document;
use svg::node::element::{Definitions, Polygon, Style, Title};

use crate::entities::Part;
use crate::geometry::primitives::Point;
use crate::geometry::{bounding_box, transform_point};

/// Width of the drawing area, in mm
pub const VIEWBOX_WIDTH: f64 = 1000.0;
/// Height of the drawing area, in mm
pub const VIEWBOX_HEIGHT: f64 = 2000.0;
/// Offset of all drawn geometry from the document origin
pub const PADDING: f64 = 10.0;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const STYLE: &str = "
      .viewbox { stroke: #000000; stroke-width: 2; fill: #ffffff; }
      .part { stroke: #000000; stroke-width: 1; fill: none; }
    ";

/// Renders the placed parts of one sheet as a cutting SVG.
///
/// Every point of a part's first polygon is rotated by the part's rotation, translated by its
/// `(x, y)` and offset by [`PADDING`]. Parts without polygons are skipped.
pub fn generate_svg(parts: &[Part], foam_sheet_name: &str) -> String {
    let placed = parts
        .iter()
        .filter_map(|p| p.outline().map(|o| (p, o)))
        .map(|(p, o)| {
            let points = o
                .points
                .iter()
                .map(|pt| transform_point(*pt, p.rotation, p.x, p.y))
                .collect_vec();
            (p, points)
        })
        .collect_vec();

    //fit of the content into the drawing area, reported but not applied to the geometry
    let all_points = placed.iter().flat_map(|(_, pts)| pts.iter().copied()).collect_vec();
    let (min_x, min_y, max_x, max_y) = match bounding_box(&all_points) {
        Some(bb) => (bb.x_min, bb.y_min, bb.x_max, bb.y_max),
        None => (0.0, 0.0, VIEWBOX_WIDTH, VIEWBOX_HEIGHT),
    };
    let (content_w, content_h) = (max_x - min_x, max_y - min_y);
    let scale = f64::min(VIEWBOX_WIDTH / content_w, VIEWBOX_HEIGHT / content_h);
    let offset_x = (VIEWBOX_WIDTH - content_w * scale) / 2.0 - min_x * scale;
    let offset_y = (VIEWBOX_HEIGHT - content_h * scale) / 2.0 - min_y * scale;
    debug!(
        "[SVG] {foam_sheet_name}: {} parts, fit scale {scale:.3}, offset ({offset_x:.3}, {offset_y:.3})",
        placed.len()
    );

    let sheet_boundary = [
        Point(PADDING, PADDING),
        Point(VIEWBOX_WIDTH + PADDING, PADDING),
        Point(VIEWBOX_WIDTH + PADDING, VIEWBOX_HEIGHT + PADDING),
        Point(PADDING, VIEWBOX_HEIGHT + PADDING),
    ];

    let mut document = Document::new()
        .set("width", format!("{VIEWBOX_WIDTH}mm"))
        .set("height", format!("{VIEWBOX_HEIGHT}mm"))
        .set("viewBox", (0.0, 0.0, VIEWBOX_WIDTH, VIEWBOX_HEIGHT))
        .add(Title::new(foam_sheet_name))
        .add(Definitions::new().add(Style::new(STYLE)))
        .add(
            Polygon::new()
                .set("points", points_attr(sheet_boundary.iter().copied()))
                .set("class", "viewbox"),
        );

    for (part, points) in placed {
        let padded = points.into_iter().map(|p| p.translated(PADDING, PADDING));
        document = document.add(
            Polygon::new()
                .set("id", part.id.as_str())
                .set("points", points_attr(padded))
                .set("class", "part"),
        );
    }

    format!("{XML_HEADER}\n{document}")
}

fn points_attr(points: impl Iterator<Item = Point>) -> String {
    points.map(|Point(x, y)| format!("{x},{y}")).join(" ")
}
