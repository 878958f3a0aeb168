use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::svg_validation::ValidationError;
use crate::svg_validation::parsing::{extract_path_coordinates, path_data, svg_root_attribute};

/// Unit tag of dimensions taken from the `viewBox` attribute
pub const VIEWBOX_UNIT: &str = "viewBox";
/// Unit tag of dimensions measured on the path coordinates
pub const PATH_UNITS: &str = "path-units";

static DIMENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([\d.]+)([a-z%]*)$").unwrap());

/// Size of an SVG document as declared by its root element
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SvgDimensions {
    pub width: f64,
    pub height: f64,
    pub unit: String,
}

impl SvgDimensions {
    pub fn new(width: f64, height: f64, unit: &str) -> Self {
        SvgDimensions {
            width,
            height,
            unit: unit.to_string(),
        }
    }
}

/// Extent of the coordinates of the main path
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PathBounds {
    pub width: f64,
    pub height: f64,
}

/// A single length attribute (`"120mm"`, `"450"`, ...) split in value and unit.
/// Empty or unparsable input yields `0px`.
pub fn parse_svg_dimension(s: &str) -> (f64, String) {
    let parsed = DIMENSION.captures(s.trim()).and_then(|caps| {
        let value = caps[1].parse::<f64>().ok()?;
        let unit = match &caps[2] {
            "" => "px".to_string(),
            u => u.to_string(),
        };
        Some((value, unit))
    });
    parsed.unwrap_or_else(|| (0.0, "px".to_string()))
}

/// Reads the declared size of an SVG document.
///
/// When width or height is missing (or zero) and the `viewBox` has four numeric values, the viewBox
/// size is returned with unit [`VIEWBOX_UNIT`]. A document without a root `<svg>` element yields
/// `0 x 0 px`.
pub fn extract_svg_dimensions(svg: &str) -> SvgDimensions {
    match try_extract_svg_dimensions(svg) {
        Ok(dims) => dims,
        Err(e) => {
            warn!("{e}, falling back to 0x0px");
            SvgDimensions::new(0.0, 0.0, "px")
        }
    }
}

fn try_extract_svg_dimensions(svg: &str) -> Result<SvgDimensions, ValidationError> {
    if !svg.contains("<svg") && !svg.contains("<SVG") {
        return Err(ValidationError::MalformedAsset(
            "no <svg> root element".to_string(),
        ));
    }
    let attr = |name: &str| svg_root_attribute(svg, name).unwrap_or_default();
    let (width, w_unit) = parse_svg_dimension(&attr("width"));
    let (height, h_unit) = parse_svg_dimension(&attr("height"));

    if width == 0.0 || height == 0.0 {
        if let Some([_, _, vb_w, vb_h]) = parse_view_box(&attr("viewBox")) {
            debug!("no usable width/height, using viewBox size {vb_w}x{vb_h}");
            return Ok(SvgDimensions::new(vb_w, vb_h, VIEWBOX_UNIT));
        }
    }

    let unit = [w_unit, h_unit]
        .into_iter()
        .find(|u| !u.is_empty())
        .unwrap_or_else(|| "px".to_string());
    Ok(SvgDimensions {
        width,
        height,
        unit,
    })
}

/// The four values of a `viewBox` attribute, `None` unless there are exactly four numeric tokens
pub fn parse_view_box(view_box: &str) -> Option<[f64; 4]> {
    let values = view_box
        .split_whitespace()
        .map(|t| t.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    values.try_into().ok()
}

/// Bounding box size of the path with the longest `d` attribute (the first one on ties).
/// `None` if the document contains no path or the path holds no coordinates.
pub fn calculate_path_bounds(svg: &str) -> Option<PathBounds> {
    let all_d = path_data(svg);
    let main = all_d
        .iter()
        .reduce(|best, d| if d.len() > best.len() { d } else { best })?;

    let coords = extract_path_coordinates(main);
    if coords.len() < 2 {
        return None;
    }
    let xs = coords.iter().step_by(2);
    let ys = coords.iter().skip(1).step_by(2);
    let (x_min, x_max) = min_max(xs);
    let (y_min, y_max) = min_max(ys);

    Some(PathBounds {
        width: x_max - x_min,
        height: y_max - y_min,
    })
}

fn min_max<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("120mm", 120.0, "mm")]
    #[test_case(" 4.5in ", 4.5, "in")]
    #[test_case("450", 450.0, "px")]
    #[test_case("100%", 100.0, "%")]
    #[test_case("", 0.0, "px")]
    #[test_case("auto", 0.0, "px")]
    #[test_case("-5mm", 0.0, "px")]
    fn dimension_attributes(input: &str, value: f64, unit: &str) {
        assert_eq!(parse_svg_dimension(input), (value, unit.to_string()));
    }

    #[test]
    fn view_box_needs_four_numbers() {
        assert_eq!(parse_view_box("0 0 100 200"), Some([0.0, 0.0, 100.0, 200.0]));
        assert_eq!(parse_view_box(" -10  -10 20 20 "), Some([-10.0, -10.0, 20.0, 20.0]));
        assert_eq!(parse_view_box("0 0 100"), None);
        assert_eq!(parse_view_box("0 0 a b"), None);
        assert_eq!(parse_view_box(""), None);
    }

    #[test]
    fn unitless_width_decides_the_unit() {
        let dims = extract_svg_dimensions(r#"<svg width="10" height="20cm"></svg>"#);
        assert_eq!(dims, SvgDimensions::new(10.0, 20.0, "px"));
    }

    #[test]
    fn longest_path_wins() {
        let svg = r#"<svg><path d="M0 0 L5 5"/><path d="M 0 0 L 50 0 L 50 80 L 0 80 Z"/></svg>"#;
        assert_eq!(
            calculate_path_bounds(svg),
            Some(PathBounds {
                width: 50.0,
                height: 80.0
            })
        );
        assert_eq!(calculate_path_bounds("<svg></svg>"), None);
        assert_eq!(calculate_path_bounds(r#"<svg><path d="Z"/></svg>"#), None);
    }
}
