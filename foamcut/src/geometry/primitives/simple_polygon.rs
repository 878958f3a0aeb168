use anyhow::Result;
use anyhow::{bail, ensure};
use itertools::Itertools;

use crate::geometry::Transformation;
use crate::geometry::bounding_box;
use crate::geometry::geo_traits::{CollidesWith, Shape, Transformable};
use crate::geometry::primitives::{Edge, Point, Rect};
use crate::util::{FPA, GEOM_TOLERANCE};

/// Geometric primitive representing a simple polygon: <https://en.wikipedia.org/wiki/Simple_polygon>
/// Points are always stored in counterclockwise order.
#[derive(Clone, Debug)]
pub struct SPolygon {
    pub points: Vec<Point>,
    pub bbox: Rect,
    pub area: f64,
}

impl SPolygon {
    /// Create a new simple polygon from a set of points.
    /// Clockwise input is reversed, polygons without area are rejected.
    pub fn new(mut points: Vec<Point>) -> Result<Self> {
        ensure!(
            points.len() >= 3,
            "simple polygon must have at least 3 points: {points:?}"
        );
        ensure!(
            points.iter().unique().count() == points.len(),
            "simple polygon should not contain duplicate points: {points:?}"
        );

        let area = match SPolygon::calculate_area(&points) {
            area if area == 0.0 => bail!("simple polygon has no area: {points:?}"),
            area if area < 0.0 => {
                //edges should always be ordered counterclockwise (positive area)
                points.reverse();
                -area
            }
            area => area,
        };
        let bbox = SPolygon::generate_bounding_box(&points);

        Ok(SPolygon { points, bbox, area })
    }

    pub fn get_point(&self, i: usize) -> Point {
        self.points[i]
    }

    pub fn get_edge(&self, i: usize) -> Edge {
        let j = (i + 1) % self.n_points();
        Edge::new_unchecked(self.points[i], self.points[j])
    }

    pub fn edge_iter(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.n_points()).map(move |i| self.get_edge(i))
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn generate_bounding_box(points: &[Point]) -> Rect {
        bounding_box(points).expect("polygon without points")
    }

    //https://en.wikipedia.org/wiki/Shoelace_formula
    //counterclockwise = positive area, clockwise = negative area
    pub fn calculate_area(points: &[Point]) -> f64 {
        let mut sigma = 0.0;
        for i in 0..points.len() {
            let j = (i + 1) % points.len();
            let (x_i, y_i) = points[i].into();
            let (x_j, y_j) = points[j].into();
            sigma += (y_i + y_j) * (x_i - x_j)
        }
        0.5 * sigma
    }

    /// True if `point` lies inside `self` and further than [`GEOM_TOLERANCE`] from its boundary.
    pub fn strictly_contains(&self, point: &Point) -> bool {
        self.collides_with(point)
            && self
                .edge_iter()
                .all(|e| e.sq_distance_to(point) > GEOM_TOLERANCE * GEOM_TOLERANCE)
    }

    /// True if the interiors of `self` and `other` overlap.
    /// Polygons that only touch along their boundaries do not overlap.
    pub fn overlaps(&self, other: &SPolygon) -> bool {
        if !self.bbox.overlaps(&other.bbox) {
            return false;
        }
        if self
            .edge_iter()
            .cartesian_product(other.edge_iter().collect_vec())
            .any(|(e1, e2)| e1.crosses(&e2))
        {
            return true;
        }
        //no proper crossings: either disjoint, touching, or one is (partially) enclosed by the other
        let probes = |a: &SPolygon| {
            a.points
                .iter()
                .copied()
                .chain(a.edge_iter().map(|e| e.centroid()))
                .chain(std::iter::once(a.centroid()))
                .collect_vec()
        };
        probes(self).iter().any(|p| other.strictly_contains(p))
            || probes(other).iter().any(|p| self.strictly_contains(p))
    }
}

impl Shape for SPolygon {
    fn centroid(&self) -> Point {
        //based on: https://en.wikipedia.org/wiki/Centroid#Of_a_polygon
        let area = self.area();
        let (mut c_x, mut c_y) = (0.0, 0.0);

        for i in 0..self.n_points() {
            let j = (i + 1) % self.n_points();
            let Point(x_i, y_i) = self.get_point(i);
            let Point(x_j, y_j) = self.get_point(j);
            c_x += (x_i + x_j) * (x_i * y_j - x_j * y_i);
            c_y += (y_i + y_j) * (x_i * y_j - x_j * y_i);
        }

        Point(c_x / (6.0 * area), c_y / (6.0 * area))
    }

    fn area(&self) -> f64 {
        self.area
    }

    fn bbox(&self) -> Rect {
        self.bbox
    }
}

impl Transformable for SPolygon {
    fn transform(&mut self, t: &Transformation) -> &mut Self {
        //destructuring pattern to ensure that the code is updated when the struct changes
        let SPolygon {
            points,
            bbox,
            area: _,
        } = self;

        points.iter_mut().for_each(|p| {
            p.transform(t);
        });
        *bbox = SPolygon::generate_bounding_box(points);

        self
    }
}

impl CollidesWith<Point> for SPolygon {
    fn collides_with(&self, point: &Point) -> bool {
        //based on the ray casting algorithm: https://en.wikipedia.org/wiki/Point_in_polygon#Ray_casting_algorithm
        if !self.bbox.collides_with(point) {
            return false;
        }
        //horizontal ray shot to the right, towards a point certainly outside the shape
        let point_outside = Point(self.bbox.x_max + self.bbox.width(), point.1);
        let ray = Edge::new_unchecked(*point, point_outside);

        let mut n_intersections = 0;
        for edge in self.edge_iter() {
            let (s_x, s_y) = (FPA(edge.start.0), FPA(edge.start.1));
            let (e_x, e_y) = (FPA(edge.end.0), FPA(edge.end.1));
            let (p_x, p_y) = (FPA(point.0), FPA(point.1));

            if (s_y == p_y && s_x > p_x) || (e_y == p_y && e_x > p_x) {
                //ray passes through (or dangerously close to) a vertex,
                //only count the edge if it lies below the ray
                if s_y < p_y || e_y < p_y {
                    n_intersections += 1;
                }
            } else if ray.collides_with(&edge) {
                n_intersections += 1;
            }
        }

        n_intersections % 2 == 1
    }
}

impl From<Rect> for SPolygon {
    fn from(r: Rect) -> Self {
        let area = r.area();
        SPolygon {
            points: r.corners().to_vec(),
            bbox: r,
            area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn square(x: f64, y: f64, s: f64) -> SPolygon {
        SPolygon::from(Rect::try_new(x, y, x + s, y + s).unwrap())
    }

    #[test]
    fn clockwise_input_is_reversed() {
        let cw = vec![
            Point(0.0, 0.0),
            Point(0.0, 10.0),
            Point(10.0, 10.0),
            Point(10.0, 0.0),
        ];
        let poly = SPolygon::new(cw).unwrap();
        assert_approx_eq!(f64, poly.area, 100.0);
        assert!(SPolygon::calculate_area(&poly.points) > 0.0);
    }

    #[test]
    fn degenerate_input_is_rejected() {
        assert!(SPolygon::new(vec![Point(0.0, 0.0), Point(1.0, 1.0)]).is_err());
        assert!(SPolygon::new(vec![Point(0.0, 0.0), Point(1.0, 1.0), Point(2.0, 2.0)]).is_err());
    }

    #[test]
    fn overlap_detection() {
        let a = square(0.0, 0.0, 10.0);
        assert!(a.overlaps(&square(5.0, 5.0, 10.0)));
        //enclosed
        assert!(a.overlaps(&square(2.0, 2.0, 2.0)));
        //identical
        assert!(a.overlaps(&square(0.0, 0.0, 10.0)));
        //touching along an edge
        assert!(!a.overlaps(&square(10.0, 0.0, 10.0)));
        //disjoint
        assert!(!a.overlaps(&square(20.0, 20.0, 1.0)));
    }

    #[test]
    fn point_in_polygon() {
        let tri = SPolygon::new(vec![Point(0.0, 0.0), Point(10.0, 0.0), Point(0.0, 10.0)]).unwrap();
        assert!(tri.collides_with(&Point(2.0, 2.0)));
        assert!(!tri.collides_with(&Point(8.0, 8.0)));
        assert_eq!(tri.centroid(), Point(10.0 / 3.0, 10.0 / 3.0));
    }
}
