use ordered_float::NotNan;

use crate::geometry::DTransformation;

//upper two rows of the homogeneous matrix, the last row is always [0, 0, 1]
type Matrix = [[NotNan<f64>; 3]; 2];

#[derive(Clone, Debug, PartialEq)]
/// Rigid transformation in homogeneous matrix form.
/// Applying it to a point rotates around the origin first and translates second.
pub struct Transformation {
    matrix: Matrix,
}

impl Transformation {
    pub fn from_translation((tx, ty): (f64, f64)) -> Self {
        Self {
            matrix: rot_transl_m(0.0, (tx, ty)),
        }
    }

    /// Counterclockwise rotation around the origin, `angle` in radians
    pub fn from_rotation(angle: f64) -> Self {
        Self {
            matrix: rot_transl_m(angle, (0.0, 0.0)),
        }
    }

    pub fn from_dt(dt: &DTransformation) -> Self {
        Self {
            matrix: rot_transl_m(dt.rotation.to_radians(), dt.translation),
        }
    }

    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let [r0, r1] = &self.matrix;
        (
            r0[0].into_inner() * x + r0[1].into_inner() * y + r0[2].into_inner(),
            r1[0].into_inner() * x + r1[1].into_inner() * y + r1[2].into_inner(),
        )
    }
}

//rotation followed by translation
fn rot_transl_m(angle: f64, (tx, ty): (f64, f64)) -> Matrix {
    let (sin, cos) = angle.sin_cos();
    let cos = NotNan::new(cos).expect("cos is NaN");
    let sin = NotNan::new(sin).expect("sin is NaN");
    let h = NotNan::new(tx).expect("tx is NaN");
    let k = NotNan::new(ty).expect("ty is NaN");

    [[cos, -sin, h], [sin, cos, k]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn placement_rotates_before_translating() {
        let t = DTransformation::new(90.0, (10.0, 5.0)).compose();
        let (x, y) = t.apply((1.0, 0.0));
        assert_approx_eq!(f64, x, 10.0, epsilon = 1e-9);
        assert_approx_eq!(f64, y, 6.0, epsilon = 1e-9);

        let (x, y) = Transformation::from_translation((-2.0, 3.0)).apply((1.0, 1.0));
        assert_approx_eq!(f64, x, -1.0);
        assert_approx_eq!(f64, y, 4.0);
    }

    #[test]
    fn rotation_only() {
        let (x, y) = Transformation::from_rotation(std::f64::consts::PI).apply((2.0, 1.0));
        assert_approx_eq!(f64, x, -2.0, epsilon = 1e-9);
        assert_approx_eq!(f64, y, -1.0, epsilon = 1e-9);
    }
}
