use std::time::Instant;

use log::{debug, info, warn};
use thousands::Separable;

use foamcut::entities::{
    NestingResult, Part, Sheet, SheetType, UnplaceablePart, UnplaceableReason,
};

use crate::config::LBFConfig;
use crate::opt::search::{LBFPlacement, fits_sheet_type, item_placement_order, search};

/// Left-Bottom-Fill (LBF) optimizer for nesting parts onto one or more sheets.
///
/// Parts are placed one at a time, largest bounding box first. Every open sheet is searched in order,
/// a new sheet is only opened when the part fits none of them.
pub struct LBFOptimizer {
    pub parts: Vec<Part>,
    pub sheet_types: Vec<SheetType>,
    pub config: LBFConfig,
    pub sample_counter: usize,
}

impl LBFOptimizer {
    pub fn new(parts: Vec<Part>, sheet_types: Vec<SheetType>, config: LBFConfig) -> Self {
        assert!(!sheet_types.is_empty(), "at least one sheet type is required");
        assert!(!config.rotations.is_empty(), "at least one rotation is required");
        Self {
            parts,
            sheet_types,
            config,
            sample_counter: 0,
        }
    }

    pub fn solve(&mut self) -> NestingResult {
        let start = Instant::now();
        let n_parts = self.parts.len();

        let mut sheets: Vec<Sheet> = vec![];
        let mut unplaceable = vec![];
        let mut n_placed = 0;

        for idx in item_placement_order(&self.parts) {
            let part = &self.parts[idx];
            let placement = match self.check_placeable(part) {
                Err(reason) => Err(reason),
                Ok(()) => search_sheets(
                    &mut sheets,
                    part,
                    &self.sheet_types,
                    &self.config,
                    &mut self.sample_counter,
                ),
            };

            match placement {
                Ok((sheet_idx, p)) => {
                    let mut placed = part.clone();
                    placed.rotation = p.rotation;
                    placed.x = p.translation.0;
                    placed.y = p.translation.1;
                    sheets[sheet_idx].parts.push(placed);
                    n_placed += 1;
                    info!(
                        "[LBF] placing part {}/{} with id {} at [r: {:.1}°, t: ({:.3}, {:.3})] on sheet {}",
                        n_placed, n_parts, part.id, p.rotation, p.translation.0, p.translation.1, sheet_idx
                    );
                }
                Err(reason) => {
                    warn!("[LBF] part {} could not be placed: {}", part.id, reason);
                    unplaceable.push(UnplaceablePart {
                        part_id: part.id.clone(),
                        sku: part.source.sku.clone(),
                        order_id: part.source.order_id.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            "[LBF] optimization finished in {:.3}ms ({} samples)",
            start.elapsed().as_secs_f64() * 1000.0,
            self.sample_counter.separate_with_commas()
        );

        let result = NestingResult {
            placements: sheets,
            unplaceable,
        };
        for sheet in result.placements.iter() {
            info!(
                "[LBF] sheet {} ({}x{}) contains {} parts, utilization {:.3}%, waste {:.0}mm²",
                sheet.sheet_index,
                sheet.width,
                sheet.height,
                sheet.parts.len(),
                sheet.utilization() * 100.0,
                sheet.waste()
            );
        }
        info!(
            "[LBF] solution contains {} parts on {} sheets with a utilization of {:.3}%, {} unplaceable",
            result.n_placed(),
            result.placements.len(),
            result.utilization() * 100.0,
            result.unplaceable.len()
        );
        result
    }

    fn check_placeable(&self, part: &Part) -> Result<(), UnplaceableReason> {
        if part.outline().is_none() {
            return Err(UnplaceableReason::MissingOutline);
        }
        match self
            .sheet_types
            .iter()
            .any(|st| fits_sheet_type(part, st, &self.config))
        {
            true => Ok(()),
            false => Err(UnplaceableReason::ExceedsSheet),
        }
    }
}

/// Searches the open sheets in order, then opens a new sheet of the first type the part fits on.
fn search_sheets(
    sheets: &mut Vec<Sheet>,
    part: &Part,
    sheet_types: &[SheetType],
    config: &LBFConfig,
    sample_counter: &mut usize,
) -> Result<(usize, LBFPlacement), UnplaceableReason> {
    for (i, sheet) in sheets.iter().enumerate() {
        debug!("[LBF] searching sheet {i} for part {}", part.id);
        let (placement, n_samples) = search(sheet, part, config);
        *sample_counter += n_samples;
        if let Some(p) = placement {
            return Ok((i, p));
        }
    }

    if config.max_sheets.is_some_and(|max| sheets.len() >= max) {
        return Err(UnplaceableReason::SheetLimitReached);
    }

    for sheet_type in sheet_types.iter() {
        let empty = Sheet::new(sheets.len(), *sheet_type);
        let (placement, n_samples) = search(&empty, part, config);
        *sample_counter += n_samples;
        if let Some(p) = placement {
            debug!(
                "[LBF] opening sheet {} ({}x{})",
                empty.sheet_index, sheet_type.width, sheet_type.height
            );
            sheets.push(empty);
            return Ok((sheets.len() - 1, p));
        }
    }
    Err(UnplaceableReason::ExceedsSheet)
}
