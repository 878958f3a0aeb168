use anyhow::Result;
use anyhow::ensure;

use crate::geometry::Transformation;
use crate::geometry::geo_traits::{CollidesWith, Transformable};
use crate::geometry::primitives::Point;
use crate::util::GEOM_TOLERANCE;

/// Line segment between two [`Point`]s
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    pub fn new(start: Point, end: Point) -> Result<Self> {
        ensure!(start != end, "degenerate edge, {start:?} == {end:?}");
        Ok(Edge { start, end })
    }

    pub(crate) fn new_unchecked(start: Point, end: Point) -> Self {
        Edge { start, end }
    }

    /// Returns the closest point which lies on the edge to the given point
    pub fn closest_point_on_edge(&self, point: &Point) -> Point {
        //from https://stackoverflow.com/a/6853926
        let Point(x1, y1) = self.start;
        let Point(x2, y2) = self.end;
        let Point(x, y) = *point;

        let (c, d) = (x2 - x1, y2 - y1);
        let len_sq = c * c + d * d;
        let param = if len_sq == 0.0 {
            0.0
        } else {
            ((x - x1) * c + (y - y1) * d) / len_sq
        };
        match param {
            p if p < 0.0 => self.start,
            p if p > 1.0 => self.end,
            p => Point(x1 + p * c, y1 + p * d),
        }
    }

    pub fn sq_distance_to(&self, point: &Point) -> f64 {
        self.closest_point_on_edge(point).sq_distance_to(point)
    }

    pub fn x_min(&self) -> f64 {
        f64::min(self.start.0, self.end.0)
    }

    pub fn y_min(&self) -> f64 {
        f64::min(self.start.1, self.end.1)
    }

    pub fn x_max(&self) -> f64 {
        f64::max(self.start.0, self.end.0)
    }

    pub fn y_max(&self) -> f64 {
        f64::max(self.start.1, self.end.1)
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn centroid(&self) -> Point {
        Point(
            (self.start.0 + self.end.0) / 2.0,
            (self.start.1 + self.end.1) / 2.0,
        )
    }

    /// Signed distance of `p` to the line through `self`, positive on the left side.
    fn side_of(&self, p: &Point) -> f64 {
        let Point(x1, y1) = self.start;
        let Point(x2, y2) = self.end;
        let l = self.length();
        if l == 0.0 {
            return 0.0;
        }
        ((x2 - x1) * (p.1 - y1) - (y2 - y1) * (p.0 - x1)) / l
    }

    /// True if both edges cross each other at a single point that lies in the interior of both.
    /// Touching endpoints and collinear overlaps are not considered crossings.
    pub fn crosses(&self, other: &Edge) -> bool {
        let opposite = |a: f64, b: f64| {
            (a > GEOM_TOLERANCE && b < -GEOM_TOLERANCE) || (a < -GEOM_TOLERANCE && b > GEOM_TOLERANCE)
        };
        opposite(self.side_of(&other.start), self.side_of(&other.end))
            && opposite(other.side_of(&self.start), other.side_of(&self.end))
    }
}

impl Transformable for Edge {
    fn transform(&mut self, t: &Transformation) -> &mut Self {
        let Edge { start, end } = self;
        start.transform(t);
        end.transform(t);
        self
    }
}

impl CollidesWith<Edge> for Edge {
    #[inline(always)]
    fn collides_with(&self, other: &Edge) -> bool {
        edge_intersection(self, other).is_some()
    }
}

/// Intersection point of two edges (endpoints included), `None` for disjoint or parallel edges.
pub fn edge_intersection(e1: &Edge, e2: &Edge) -> Option<Point> {
    if f64::max(e1.x_min(), e2.x_min()) > f64::min(e1.x_max(), e2.x_max())
        || f64::max(e1.y_min(), e2.y_min()) > f64::min(e1.y_max(), e2.y_max())
    {
        //bounding boxes do not overlap
        return None;
    }

    //based on: https://en.wikipedia.org/wiki/Line%E2%80%93line_intersection#Given_two_points_on_each_line_segment
    let Point(x1, y1) = e1.start;
    let Point(x2, y2) = e1.end;
    let Point(x3, y3) = e2.start;
    let Point(x4, y4) = e2.end;

    let denom = (x2 - x1) * (y4 - y3) - (y2 - y1) * (x4 - x3);
    if denom == 0.0 {
        //parallel edges
        return None;
    }
    let t = ((x2 - x4) * (y4 - y3) - (y2 - y4) * (x4 - x3)) / denom;
    let u = ((x2 - x4) * (y2 - y1) - (y2 - y4) * (x2 - x1)) / denom;

    match (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        true => Some(Point(x2 + t * (x1 - x2), y2 + t * (y1 - y2))),
        false => None,
    }
}
