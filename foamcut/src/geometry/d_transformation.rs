use crate::geometry::Transformation;

/// Placement of a part as it is stored and exported: a counterclockwise rotation around the origin
/// in degrees, followed by a translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DTransformation {
    pub rotation: f64,
    pub translation: (f64, f64),
}

impl DTransformation {
    pub fn new(rotation: f64, translation: (f64, f64)) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn compose(&self) -> Transformation {
        Transformation::from_dt(self)
    }
}
