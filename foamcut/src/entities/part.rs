use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::Transformable;
use crate::geometry::primitives::{Rect, SPolygon};
use crate::geometry::{DTransformation, Transformation};
use crate::util::FPA;

/// Where a [`Part`] came from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartSource {
    pub order_id: String,
    pub customer_name: String,
    pub sku: String,
    pub foam_sheet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

/// A single physical piece to be cut out of a sheet.
/// Only the first polygon takes part in nesting, the others are carried along (e.g. inner cut-outs).
#[derive(Clone, Debug)]
pub struct Part {
    pub id: String,
    pub polygons: Vec<SPolygon>,
    /// Rotation in degrees, counterclockwise. Zero until placed.
    pub rotation: f64,
    /// Translation in the x-direction, applied after the rotation. Zero until placed.
    pub x: f64,
    /// Translation in the y-direction, applied after the rotation. Zero until placed.
    pub y: f64,
    pub source: PartSource,
}

impl Part {
    pub fn new(id: String, polygons: Vec<SPolygon>, source: PartSource) -> Self {
        Part {
            id,
            polygons,
            rotation: 0.0,
            x: 0.0,
            y: 0.0,
            source,
        }
    }

    /// The outline used for placement, `None` if the part has no polygons
    pub fn outline(&self) -> Option<&SPolygon> {
        self.polygons.first()
    }

    pub fn d_transformation(&self) -> DTransformation {
        DTransformation::new(self.rotation, (self.x, self.y))
    }

    pub fn transformation(&self) -> Transformation {
        self.d_transformation().compose()
    }

    /// The outline as it lies on the sheet
    pub fn placed_outline(&self) -> Option<SPolygon> {
        let t = self.transformation();
        self.outline().map(|o| o.transform_clone(&t))
    }

    /// Bounding box of the outline as it lies on the sheet
    pub fn placed_bbox(&self) -> Option<Rect> {
        self.placed_outline().map(|o| o.bbox)
    }
}

/// Shifts all parts back inside `min_bound` along every axis on which their combined bounding box
/// sticks out below it. Placements already at or above the bound are left untouched.
pub fn align_placements_to_origin(parts: &mut [Part], min_bound: (f64, f64)) {
    let combined = parts
        .iter()
        .filter_map(|p| p.placed_bbox())
        .reduce(Rect::bounding_rect);

    if let Some(bbox) = combined {
        let dx = (min_bound.0 - bbox.x_min).max(0.0);
        let dy = (min_bound.1 - bbox.y_min).max(0.0);
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        log::debug!("aligning {} parts, shift: ({dx:.3}, {dy:.3})", parts.len());
        for p in parts.iter_mut() {
            p.x += dx;
            p.y += dy;
        }
    }
}

/// Checks whether every placed outline lies within `bounds` (up to a small tolerance).
/// Parts without an outline are ignored.
pub fn validate_placement_bounds(parts: &[Part], bounds: Rect) -> bool {
    parts.iter().filter_map(|p| p.placed_bbox()).all(|bb| {
        FPA(bb.x_min) >= FPA(bounds.x_min)
            && FPA(bb.y_min) >= FPA(bounds.y_min)
            && FPA(bb.x_max) <= FPA(bounds.x_max)
            && FPA(bb.y_max) <= FPA(bounds.y_max)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn rect_part(id: &str, w: f64, h: f64) -> Part {
        let outline = SPolygon::from(Rect::try_new(0.0, 0.0, w, h).unwrap());
        Part::new(id.to_string(), vec![outline], PartSource::default())
    }

    #[test]
    fn rotated_part_bbox() {
        let mut part = rect_part("a", 100.0, 50.0);
        part.rotation = 90.0;
        part.x = 50.0;
        let bb = part.placed_bbox().unwrap();
        assert_approx_eq!(f64, bb.x_min, 0.0, epsilon = 1e-9);
        assert_approx_eq!(f64, bb.x_max, 50.0, epsilon = 1e-9);
        assert_approx_eq!(f64, bb.y_max, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn align_and_validate() {
        let mut parts = vec![rect_part("a", 10.0, 10.0), rect_part("b", 10.0, 10.0)];
        parts[0].x = -5.0;
        parts[0].y = 4.0;
        parts[1].x = 10.0;
        parts[1].y = 4.0;

        let bounds = Rect::try_new(0.0, 0.0, 30.0, 20.0).unwrap();
        assert!(!validate_placement_bounds(&parts, bounds));

        align_placements_to_origin(&mut parts, (0.0, 0.0));
        assert_approx_eq!(f64, parts[0].x, 0.0);
        assert_approx_eq!(f64, parts[1].x, 15.0);
        //y was already within bounds
        assert_approx_eq!(f64, parts[1].y, 4.0);
        assert!(validate_placement_bounds(&parts, bounds));
    }
}
