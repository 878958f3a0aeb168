use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::svg_validation::dimensions::{PATH_UNITS, VIEWBOX_UNIT, parse_view_box};
use crate::svg_validation::parsing::{set_svg_root_attribute, svg_root_attribute};
use crate::svg_validation::{
    DimensionTable, ExpectedDimensions, SvgDimensions, calculate_path_bounds, convert_to_mm,
    extract_svg_dimensions,
};

/// Maximum deviation from the expected size, per axis, for an asset to be accepted
pub const DIMENSION_TOLERANCE_PERCENT: f64 = 5.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("no expected dimensions found for SKU: {0}")]
    UnknownSku(String),
    #[error("malformed SVG asset: {0}")]
    MalformedAsset(String),
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DimensionDifference {
    pub width_diff: f64,
    pub height_diff: f64,
    pub width_diff_percent: f64,
    pub height_diff_percent: f64,
}

/// Outcome of checking one SVG asset against its expected dimensions
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub actual_dimensions: SvgDimensions,
    pub expected_dimensions: ExpectedDimensions,
    pub dimension_difference: DimensionDifference,
    pub recommendations: Vec<String>,
}

impl ValidationResult {
    /// A failed result for an asset that could not be validated at all
    pub fn failed(sku: &str, recommendation: &str) -> Self {
        ValidationResult {
            is_valid: false,
            actual_dimensions: SvgDimensions::new(0.0, 0.0, "unknown"),
            expected_dimensions: ExpectedDimensions {
                sku: sku.to_string(),
                width: 0.0,
                height: 0.0,
            },
            dimension_difference: DimensionDifference {
                width_diff: 0.0,
                height_diff: 0.0,
                width_diff_percent: 100.0,
                height_diff_percent: 100.0,
            },
            recommendations: vec![recommendation.to_string()],
        }
    }
}

/// Checks the size of an SVG asset against the expected dimensions of `sku`.
///
/// Declared width and height are converted to millimetres. When the document only declares a
/// `viewBox`, or a declared size is zero, the bounding box of the main path is measured instead and
/// reported with unit [`PATH_UNITS`]. The asset is valid when both axes deviate at most
/// [`DIMENSION_TOLERANCE_PERCENT`] from the expectation.
pub fn validate_svg_dimensions(
    table: &DimensionTable,
    sku: &str,
    svg: &str,
) -> Result<ValidationResult, ValidationError> {
    let expected = table
        .get(sku)
        .ok_or_else(|| ValidationError::UnknownSku(sku.to_string()))?;

    let declared = extract_svg_dimensions(svg);
    let (width_mm, height_mm) = match declared.unit == VIEWBOX_UNIT {
        true => (declared.width, declared.height),
        false => (
            convert_to_mm(declared.width, &declared.unit),
            convert_to_mm(declared.height, &declared.unit),
        ),
    };

    let path_bounds = match declared.unit == VIEWBOX_UNIT || width_mm == 0.0 || height_mm == 0.0 {
        true => calculate_path_bounds(svg),
        false => None,
    };

    let (actual, width_mm, height_mm) = match path_bounds {
        Some(pb) => {
            debug!("{sku}: measured path bounds {}x{}", pb.width, pb.height);
            (SvgDimensions::new(pb.width, pb.height, PATH_UNITS), pb.width, pb.height)
        }
        None => (declared.clone(), width_mm, height_mm),
    };

    let width_diff = (width_mm - expected.width).abs();
    let height_diff = (height_mm - expected.height).abs();
    let diff = DimensionDifference {
        width_diff,
        height_diff,
        width_diff_percent: width_diff / expected.width * 100.0,
        height_diff_percent: height_diff / expected.height * 100.0,
    };
    let is_valid = diff.width_diff_percent <= DIMENSION_TOLERANCE_PERCENT
        && diff.height_diff_percent <= DIMENSION_TOLERANCE_PERCENT;

    let mut recommendations = vec![];
    if !is_valid {
        if diff.width_diff_percent > DIMENSION_TOLERANCE_PERCENT {
            recommendations.push(format!(
                "Width is off by {:.1}%. Consider scaling width by factor of {:.3}.",
                diff.width_diff_percent,
                expected.width / width_mm
            ));
        }
        if diff.height_diff_percent > DIMENSION_TOLERANCE_PERCENT {
            recommendations.push(format!(
                "Height is off by {:.1}%. Consider scaling height by factor of {:.3}.",
                diff.height_diff_percent,
                expected.height / height_mm
            ));
        }
        if declared.unit == VIEWBOX_UNIT || declared.unit == PATH_UNITS {
            recommendations.push(
                "SVG uses viewBox or path coordinates. Consider adding explicit width/height attributes with units."
                    .to_string(),
            );
        }
        if declared.unit != "mm" {
            recommendations.push(format!(
                "SVG uses {} units. Consider converting to millimeters for precision.",
                declared.unit
            ));
        }
    }

    Ok(ValidationResult {
        is_valid,
        actual_dimensions: actual,
        expected_dimensions: expected.clone(),
        dimension_difference: diff,
        recommendations,
    })
}

/// Rewrites the root element of an invalid asset so that it declares the expected size.
///
/// Width and height are set in millimetres. An existing four-value `viewBox` keeps its origin and has
/// its size scaled uniformly, otherwise a `viewBox` spanning the expected size is added.
/// A valid asset is returned unchanged.
pub fn generate_corrected_svg(
    table: &DimensionTable,
    sku: &str,
    svg: &str,
) -> Result<String, ValidationError> {
    let validation = validate_svg_dimensions(table, sku, svg)?;
    if validation.is_valid {
        return Ok(svg.to_string());
    }
    let expected = &validation.expected_dimensions;
    let actual = &validation.actual_dimensions;

    let corrected = correct_root_attributes(svg, expected, actual);
    match corrected {
        Some(c) => Ok(c),
        None => {
            warn!("could not correct SVG of {sku}, no <svg> root element");
            Ok(svg.to_string())
        }
    }
}

fn correct_root_attributes(
    svg: &str,
    expected: &ExpectedDimensions,
    actual: &SvgDimensions,
) -> Option<String> {
    let svg = set_svg_root_attribute(svg, "width", &format!("{}mm", expected.width))?;
    let svg = set_svg_root_attribute(&svg, "height", &format!("{}mm", expected.height))?;

    match svg_root_attribute(&svg, "viewBox") {
        Some(view_box) => {
            let tokens = view_box.split_whitespace().collect::<Vec<_>>();
            match (tokens.as_slice(), parse_view_box(&view_box)) {
                //origin is kept as written
                ([x, y, _, _], Some([_, _, vb_w, vb_h])) => {
                    let nonzero = |v: f64| if v == 0.0 { 1.0 } else { v };
                    let scale = f64::min(
                        expected.width / nonzero(actual.width),
                        expected.height / nonzero(actual.height),
                    );
                    let value = format!("{x} {y} {} {}", vb_w * scale, vb_h * scale);
                    set_svg_root_attribute(&svg, "viewBox", &value)
                }
                _ => Some(svg),
            }
        }
        None => set_svg_root_attribute(
            &svg,
            "viewBox",
            &format!("0 0 {} {}", expected.width, expected.height),
        ),
    }
}

/// Validates a batch of `(sku, svg)` pairs.
/// A failing validation does not abort the batch, it is reported as a failed result instead.
pub fn batch_validate_svgs(table: &DimensionTable, svgs: &[(String, String)]) -> Vec<ValidationResult> {
    svgs.iter()
        .map(|(sku, svg)| {
            validate_svg_dimensions(table, sku, svg).unwrap_or_else(|e| {
                warn!("error validating SVG for SKU {sku}: {e}");
                ValidationResult::failed(sku, "Error occurred during validation")
            })
        })
        .collect()
}
