use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::entities::{NestingItem, Sheet};

/// Why a part did not end up on any sheet
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnplaceableReason {
    /// The part's bounding box is larger than every sheet type, under every allowed rotation
    ExceedsSheet,
    /// The part would fit an empty sheet, but the maximum number of sheets is in use
    SheetLimitReached,
    /// No usable outline could be found for the part's SKU
    MissingOutline,
}

impl Display for UnplaceableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UnplaceableReason::ExceedsSheet => "exceeds every sheet size",
            UnplaceableReason::SheetLimitReached => "sheet limit reached",
            UnplaceableReason::MissingOutline => "missing outline",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnplaceablePart {
    pub part_id: String,
    pub sku: String,
    pub order_id: String,
    pub reason: UnplaceableReason,
}

/// Outcome of a nesting run: the used sheets in order and the parts that could not be placed.
#[derive(Clone, Debug, Default)]
pub struct NestingResult {
    pub placements: Vec<Sheet>,
    pub unplaceable: Vec<UnplaceablePart>,
}

impl NestingResult {
    pub fn n_placed(&self) -> usize {
        self.placements.iter().map(|s| s.parts.len()).sum()
    }

    /// Combined utilization over all sheets (total part area / total sheet area)
    pub fn utilization(&self) -> f64 {
        let sheet_area: f64 = self.placements.iter().map(|s| s.area()).sum();
        let used_area: f64 = self.placements.iter().map(|s| s.used_area()).sum();
        match sheet_area {
            a if a > 0.0 => used_area / a,
            _ => 0.0,
        }
    }
}

/// The items of one foam sheet group together with their nesting result
#[derive(Clone, Debug)]
pub struct ProcessedNestingData {
    pub foam_sheet: String,
    pub items: Vec<NestingItem>,
    pub nesting_result: NestingResult,
}
