//! Turning SVG assets into nestable outlines

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use foamcut::geometry::bounding_box;
use foamcut::geometry::primitives::{Point, SPolygon};
use itertools::Itertools;
use log::{debug, warn};

use crate::svg_validation::{
    DimensionTable, ExpectedDimensions, ValidationError, generate_corrected_svg, parse_svg_path,
    path_data, validate_svg_dimensions,
};

/// Provides the SVG asset of a SKU
pub trait OutlineSource {
    /// The SVG document of `sku`, `None` if there is no asset for it
    fn svg(&self, sku: &str) -> Result<Option<String>>;
}

/// Assets stored as `{sku}.svg` files in a single directory
#[derive(Clone, Debug)]
pub struct SvgDirectory {
    pub root: PathBuf,
}

impl SvgDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SvgDirectory { root: root.into() }
    }
}

impl OutlineSource for SvgDirectory {
    fn svg(&self, sku: &str) -> Result<Option<String>> {
        let path = self.root.join(format!("{sku}.svg"));
        if !path.is_file() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .with_context(|| format!("could not read SVG asset: {}", path.display()))
    }
}

impl OutlineSource for HashMap<String, String> {
    fn svg(&self, sku: &str) -> Result<Option<String>> {
        Ok(self.get(sku).cloned())
    }
}

/// Outline of a product, ready to be placed
#[derive(Clone, Debug)]
pub struct PreparedOutline {
    pub polygon: SPolygon,
    /// Expected size of the product, if it is in the reference table
    pub expected: Option<ExpectedDimensions>,
}

impl PreparedOutline {
    pub fn width(&self) -> f64 {
        self.polygon.bbox.width()
    }

    pub fn height(&self) -> f64 {
        self.polygon.bbox.height()
    }
}

/// The sub-path with the most points over all paths of the document (the first one on ties)
pub fn main_outline(svg: &str) -> Option<Vec<Point>> {
    path_data(svg)
        .iter()
        .flat_map(|d| parse_svg_path(d))
        .reduce(|best, sp| if sp.len() > best.len() { sp } else { best })
}

/// Validates the SVG asset of `sku` and extracts its outline.
///
/// Assets of SKUs in the reference table are checked first and corrected when their declared size
/// is off. The outline is shifted to the origin and, when the expected size is known, scaled
/// uniformly so that it fits that size.
pub fn prepare_outline(table: &DimensionTable, sku: &str, svg: &str) -> Result<PreparedOutline> {
    let expected = table.get(sku).cloned();
    let svg = match expected.is_some() {
        true => checked_svg(table, sku, svg)?,
        false => {
            debug!("[PROC] no expected dimensions for {sku}, skipping validation");
            svg.to_string()
        }
    };

    let outline = main_outline(&svg)
        .ok_or_else(|| ValidationError::MalformedAsset(format!("no path outline for {sku}")))?;
    let bbox = bounding_box(&outline)
        .ok_or_else(|| ValidationError::MalformedAsset(format!("empty outline for {sku}")))?;
    let (w, h) = (bbox.width(), bbox.height());
    if w <= 0.0 || h <= 0.0 {
        return Err(
            ValidationError::MalformedAsset(format!("outline of {sku} has no extent ({w}x{h})"))
                .into(),
        );
    }

    let scale = match &expected {
        Some(e) => f64::min(e.width / w, e.height / h),
        None => 1.0,
    };
    debug!("[PROC] outline of {sku}: {} points, {w:.3}x{h:.3}, scale {scale:.4}", outline.len());

    let points = outline
        .into_iter()
        .map(|Point(x, y)| Point((x - bbox.x_min) * scale, (y - bbox.y_min) * scale))
        .unique()
        .collect_vec();

    let polygon = SPolygon::new(points)
        .with_context(|| format!("outline of {sku} is not a valid polygon"))?;

    Ok(PreparedOutline { polygon, expected })
}

/// Validates the asset and returns it corrected if its declared size is off
fn checked_svg(table: &DimensionTable, sku: &str, svg: &str) -> Result<String> {
    let validation = validate_svg_dimensions(table, sku, svg)?;
    if validation.is_valid {
        debug!("[PROC] {sku} passed dimension validation");
        return Ok(svg.to_string());
    }

    let diff = &validation.dimension_difference;
    warn!(
        "[PROC] dimension validation failed for {sku}: width {:.1}%, height {:.1}% off",
        diff.width_diff_percent, diff.height_diff_percent
    );
    let corrected = generate_corrected_svg(table, sku, svg)?;
    if corrected == svg {
        for rec in validation.recommendations.iter() {
            warn!("[PROC] {sku}: {rec}");
        }
    } else if !validate_svg_dimensions(table, sku, &corrected)?.is_valid {
        warn!("[PROC] corrected SVG of {sku} still has dimension issues");
    }
    Ok(corrected)
}
