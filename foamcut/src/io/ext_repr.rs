use serde::{Deserialize, Serialize};

use crate::entities::{SheetType, UnplaceablePart};
use crate::geometry::DTransformation;

/// External representation of a nesting instance: the available sheet types and the demand.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtNestingInstance {
    /// Name of the instance
    pub name: String,
    /// Sheet sizes that may be used, new sheets are opened from the first type the part fits in
    pub sheet_types: Vec<SheetType>,
    /// The products to be cut
    pub items: Vec<ExtItem>,
}

/// External representation of a product to be nested, expands into `quantity` parts.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtItem {
    pub sku: String,
    pub quantity: usize,
    /// Outline of the product, in millimetres
    pub shape: ExtShape,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub foam_sheet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

/// Various ways to represent a shape
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ExtShape {
    /// Axis-aligned rectangle. With its left bottom corner at (x_min, y_min), a width and height
    Rectangle {
        x_min: f64,
        y_min: f64,
        width: f64,
        height: f64,
    },
    /// Polygon with a single outer boundary
    SimplePolygon(ExtSPolygon),
}

/// External representation of a [`SPolygon`](crate::geometry::primitives::SPolygon).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSPolygon(pub Vec<(f64, f64)>);

/// External representation of a [`NestingResult`](crate::entities::NestingResult)
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtNestingSolution {
    pub name: String,
    pub sheets: Vec<ExtSheet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unplaceable: Vec<UnplaceablePart>,
    /// Combined utilization of all sheets
    pub utilization: f64,
    pub run_time_ms: u64,
}

/// External representation of a [`Sheet`](crate::entities::Sheet)
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSheet {
    pub sheet_index: usize,
    pub width: f64,
    pub height: f64,
    pub utilization: f64,
    pub placed_parts: Vec<ExtPlacedPart>,
}

/// A part placed on a sheet with a specific transformation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtPlacedPart {
    pub part_id: String,
    pub sku: String,
    pub order_id: String,
    pub transformation: ExtTransformation,
}

/// Represents a proper rigid transformation defined as a rotation followed by translation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtTransformation {
    /// The rotation angle in degrees
    pub rotation: f64,
    /// The translation vector (x, y)
    pub translation: (f64, f64),
}

impl From<DTransformation> for ExtTransformation {
    fn from(dt: DTransformation) -> Self {
        ExtTransformation {
            rotation: dt.rotation,
            translation: dt.translation,
        }
    }
}
