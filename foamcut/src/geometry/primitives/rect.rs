use anyhow::Result;
use anyhow::ensure;

use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::{Edge, Point};
use crate::util::FPA;

/// Axis-aligned rectangle
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    /// Creates a rectangle without checking its validity, degenerate (zero width or height) rectangles are allowed.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        debug_assert!(x_min <= x_max && y_min <= y_max);
        Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn try_new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self> {
        ensure!(
            x_min < x_max && y_min < y_max,
            "invalid rectangle, x_min: {x_min}, x_max: {x_max}, y_min: {y_min}, y_max: {y_max}"
        );
        Ok(Rect::new(x_min, y_min, x_max, y_max))
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn centroid(&self) -> Point {
        Point(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Corners in counterclockwise order, starting from the bottom-left one
    pub fn corners(&self) -> [Point; 4] {
        [
            Point(self.x_min, self.y_min),
            Point(self.x_max, self.y_min),
            Point(self.x_max, self.y_max),
            Point(self.x_min, self.y_max),
        ]
    }

    pub fn edges(&self) -> [Edge; 4] {
        let c = self.corners();
        [
            Edge::new_unchecked(c[0], c[1]),
            Edge::new_unchecked(c[1], c[2]),
            Edge::new_unchecked(c[2], c[3]),
            Edge::new_unchecked(c[3], c[0]),
        ]
    }

    /// Returns a copy of `self` grown by `d` on every side.
    pub fn inflate(self, d: f64) -> Self {
        Rect::new(
            self.x_min - d,
            self.y_min - d,
            self.x_max + d,
            self.y_max + d,
        )
    }

    /// Returns the smallest rectangle that contains both `a` and `b`.
    pub fn bounding_rect(a: Rect, b: Rect) -> Rect {
        Rect::new(
            f64::min(a.x_min, b.x_min),
            f64::min(a.y_min, b.y_min),
            f64::max(a.x_max, b.x_max),
            f64::max(a.y_max, b.y_max),
        )
    }

    /// True if the interiors of `self` and `other` overlap by more than [`crate::util::GEOM_TOLERANCE`].
    /// Rectangles that only share an edge or corner do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        FPA(f64::max(self.x_min, other.x_min)) < FPA(f64::min(self.x_max, other.x_max))
            && FPA(f64::max(self.y_min, other.y_min)) < FPA(f64::min(self.y_max, other.y_max))
    }

    /// True if `other` lies within `self`, up to [`crate::util::GEOM_TOLERANCE`].
    pub fn contains_rect(&self, other: &Rect) -> bool {
        FPA(other.x_min) >= FPA(self.x_min)
            && FPA(other.y_min) >= FPA(self.y_min)
            && FPA(other.x_max) <= FPA(self.x_max)
            && FPA(other.y_max) <= FPA(self.y_max)
    }
}

impl CollidesWith<Rect> for Rect {
    #[inline(always)]
    fn collides_with(&self, other: &Rect) -> bool {
        f64::max(self.x_min, other.x_min) <= f64::min(self.x_max, other.x_max)
            && f64::max(self.y_min, other.y_min) <= f64::min(self.y_max, other.y_max)
    }
}

impl CollidesWith<Point> for Rect {
    #[inline(always)]
    fn collides_with(&self, point: &Point) -> bool {
        let Point(x, y) = *point;
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}
