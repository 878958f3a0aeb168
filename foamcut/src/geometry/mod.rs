mod d_transformation;
mod transformation;

pub mod geo_traits;
pub mod primitives;

#[doc(inline)]
pub use d_transformation::DTransformation;
#[doc(inline)]
pub use transformation::Transformation;

use crate::geometry::geo_traits::Transformable;
use crate::geometry::primitives::{Point, Rect};

/// Rotates `p` around the origin by `rotation_degrees` (counterclockwise) and then translates it by `(tx, ty)`.
pub fn transform_point(p: Point, rotation_degrees: f64, tx: f64, ty: f64) -> Point {
    let dt = DTransformation::new(rotation_degrees, (tx, ty));
    p.transform_clone(&dt.compose())
}

/// Axis-aligned bounding box of a set of points.
/// Returns `None` for an empty set.
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    if points.is_empty() {
        return None;
    }
    let (mut x_min, mut y_min) = (f64::MAX, f64::MAX);
    let (mut x_max, mut y_max) = (f64::MIN, f64::MIN);

    for Point(x, y) in points.iter() {
        x_min = x_min.min(*x);
        y_min = y_min.min(*y);
        x_max = x_max.max(*x);
        y_max = y_max.max(*y);
    }
    Some(Rect::new(x_min, y_min, x_max, y_max))
}
