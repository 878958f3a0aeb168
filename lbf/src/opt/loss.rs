use ordered_float::NotNan;

use foamcut::geometry::primitives::Rect;

const X_MULTIPLIER: f64 = 10.0;

/// The loss LBF assigns to a placement option.
/// Weighted sum of the x_max and y_max of the placed bounding box, with the horizontal dimension being more important.
/// <br>
/// A pure lexicographic comparison (always prioritizing x-axis) would lead to undesirable results due to the continuous nature of the values.
#[derive(PartialEq, PartialOrd, Copy, Clone, Debug, Eq, Ord)]
pub struct LBFLoss(NotNan<f64>);

impl LBFLoss {
    pub fn new(x_max: f64, y_max: f64) -> Self {
        let cost = x_max * X_MULTIPLIER + y_max;
        LBFLoss(NotNan::new(cost).expect("cost is NaN"))
    }

    pub fn from_bbox(bbox: &Rect) -> Self {
        LBFLoss::new(bbox.x_max, bbox.y_max)
    }

    pub fn value(&self) -> f64 {
        self.0.into_inner()
    }
}
