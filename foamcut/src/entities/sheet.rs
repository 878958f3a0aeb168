use serde::{Deserialize, Serialize};

use crate::entities::Part;
use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::Rect;

/// Dimensions of a type of sheet stock, in millimetres
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SheetType {
    pub width: f64,
    pub height: f64,
}

impl SheetType {
    pub fn new(width: f64, height: f64) -> Self {
        SheetType { width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A sheet of stock with the parts placed on it
#[derive(Clone, Debug)]
pub struct Sheet {
    pub sheet_index: usize,
    pub parts: Vec<Part>,
    pub width: f64,
    pub height: f64,
}

impl Sheet {
    pub fn new(sheet_index: usize, sheet_type: SheetType) -> Self {
        Sheet {
            sheet_index,
            parts: vec![],
            width: sheet_type.width,
            height: sheet_type.height,
        }
    }

    pub fn sheet_type(&self) -> SheetType {
        SheetType::new(self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Total area of the placement outlines on this sheet
    pub fn used_area(&self) -> f64 {
        self.parts
            .iter()
            .filter_map(|p| p.outline())
            .map(|o| o.area())
            .sum()
    }

    /// Ratio of the sheet's area covered by parts, in `[0, 1]`
    pub fn utilization(&self) -> f64 {
        match self.area() {
            a if a > 0.0 => self.used_area() / a,
            _ => 0.0,
        }
    }

    /// Area of the sheet not covered by parts
    pub fn waste(&self) -> f64 {
        self.area() - self.used_area()
    }
}
