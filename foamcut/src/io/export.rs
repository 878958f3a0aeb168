use std::time::Duration;

use itertools::Itertools;

use crate::entities::{NestingResult, Part, Sheet};
use crate::io::ext_repr::{ExtNestingSolution, ExtPlacedPart, ExtSheet};

pub fn export_placed_part(part: &Part) -> ExtPlacedPart {
    ExtPlacedPart {
        part_id: part.id.clone(),
        sku: part.source.sku.clone(),
        order_id: part.source.order_id.clone(),
        transformation: part.d_transformation().into(),
    }
}

pub fn export_sheet(sheet: &Sheet) -> ExtSheet {
    ExtSheet {
        sheet_index: sheet.sheet_index,
        width: sheet.width,
        height: sheet.height,
        utilization: sheet.utilization(),
        placed_parts: sheet.parts.iter().map(export_placed_part).collect_vec(),
    }
}

/// Composes an [`ExtNestingSolution`] from a [`NestingResult`].
pub fn export_solution(name: &str, result: &NestingResult, run_time: Duration) -> ExtNestingSolution {
    ExtNestingSolution {
        name: name.to_string(),
        sheets: result.placements.iter().map(export_sheet).collect_vec(),
        unplaceable: result.unplaceable.clone(),
        utilization: result.utilization(),
        run_time_ms: run_time.as_millis() as u64,
    }
}
