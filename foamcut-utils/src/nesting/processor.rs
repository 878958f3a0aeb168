use std::collections::HashMap;
use std::time::Instant;

use anyhow::{Result, ensure};
use foamcut::entities::{
    NestingItem, NestingResult, Part, PartSource, ProcessedNestingData, SheetType, UnplaceablePart,
    UnplaceableReason,
};
use foamcut::geometry::primitives::{Rect, SPolygon};
use foamcut::io::import::PartIdGenerator;
use lbf::config::LBFConfig;
use lbf::opt::lbf_nest::LBFOptimizer;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::nesting::outline::{OutlineSource, PreparedOutline, prepare_outline};
use crate::nesting::products::{pack_multiplier, rectangular_product};
use crate::nesting::report::{DimensionCheck, generate_dimension_check_report};
use crate::nesting::sku::{CompositeCatalogue, get_foam_sheet_from_sku};
use crate::nesting::split_parts_by_order;
use crate::svg_validation::{DimensionTable, ExpectedDimensions};

/// Foam sheet of items whose sheet is neither given nor derivable from their SKU
pub const UNKNOWN_FOAM_SHEET: &str = "N/A";

/// Configuration of the [`NestingProcessor`]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Usable area of a foam sheet, in mm
    pub sheet_type: SheetType,
    pub lbf: LBFConfig,
}

impl ProcessorConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.sheet_type.width > 0.0 && self.sheet_type.height > 0.0,
            "sheet size must be positive, got {}x{}",
            self.sheet_type.width,
            self.sheet_type.height
        );
        self.lbf.validate()
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sheet_type: SheetType::new(980.0, 1980.0),
            lbf: LBFConfig {
                rotations: vec![0.0],
                spacing: 0.0,
                max_sheets: Some(10),
                ..LBFConfig::default()
            },
        }
    }
}

/// Parts derived from a batch of order items
#[derive(Debug, Default)]
pub struct PartExpansion {
    /// Nestable parts, each with the index of the item it was derived from
    pub parts: Vec<(usize, Part)>,
    /// Units for which no outline could be found, with the index of their item
    pub missing: Vec<(usize, UnplaceablePart)>,
    /// Outline sizes of the SKUs with expected dimensions, in order of first appearance
    pub checks: Vec<DimensionCheck>,
}

/// Expands order items into parts and nests them, one nesting run per foam sheet.
pub struct NestingProcessor<S: OutlineSource> {
    pub config: ProcessorConfig,
    pub dimensions: DimensionTable,
    pub composites: CompositeCatalogue,
    pub outlines: S,
}

impl<S: OutlineSource> NestingProcessor<S> {
    pub fn new(
        config: ProcessorConfig,
        dimensions: DimensionTable,
        composites: CompositeCatalogue,
        outlines: S,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dimensions,
            composites,
            outlines,
        })
    }

    /// A processor with the default configuration and the embedded reference tables
    pub fn with_defaults(outlines: S) -> Result<Self> {
        Self::new(
            ProcessorConfig::default(),
            DimensionTable::embedded()?,
            CompositeCatalogue::embedded()?,
            outlines,
        )
    }

    /// Nests all items, grouped by the foam sheet their parts are cut from.
    /// Groups appear in order of first appearance.
    pub fn process(&self, items: &[NestingItem]) -> Result<Vec<ProcessedNestingData>> {
        let start = Instant::now();
        let expansion = self.expand_items(items)?;
        let n_parts = expansion.parts.len() + expansion.missing.len();
        info!(
            "[PROC] {} items expanded into {} parts ({} without outline)",
            items.len(),
            n_parts,
            expansion.missing.len()
        );
        if !expansion.checks.is_empty() {
            let report = generate_dimension_check_report(&expansion.checks, n_parts);
            report.lines().for_each(|l| info!("[PROC] {l}"));
        }

        let mut groups: Vec<SheetGroup> = vec![];
        for (item_idx, part) in expansion.parts {
            let group = SheetGroup::find_or_insert(&mut groups, &part.source.foam_sheet);
            group.item_idxs.push(item_idx);
            group.parts.push(part);
        }
        for (item_idx, missing) in expansion.missing {
            let sheet = self.item_foam_sheet(&items[item_idx]);
            let group = SheetGroup::find_or_insert(&mut groups, &sheet);
            group.item_idxs.push(item_idx);
            group.missing.push(missing);
        }

        let processed = groups
            .into_iter()
            .map(|mut group| {
                group.item_idxs.sort_unstable();
                group.item_idxs.dedup();
                info!("[PROC] nesting {} parts on {}", group.parts.len(), group.foam_sheet);
                let mut nesting_result = self.nest(group.parts);
                nesting_result.unplaceable.extend(group.missing);
                ProcessedNestingData {
                    foam_sheet: group.foam_sheet,
                    items: group.item_idxs.iter().map(|&i| items[i].clone()).collect(),
                    nesting_result,
                }
            })
            .collect::<Vec<_>>();

        info!(
            "[PROC] processed {} foam sheet groups in {:.3}ms",
            processed.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(processed)
    }

    /// Nests a set of parts on sheets of the configured size.
    ///
    /// When the sheet limit is hit, the run is repeated on a selection of the parts that keeps the
    /// most urgent orders whole ([`split_parts_by_order`]), halving the selection until it fits.
    /// Parts left out are reported as [`UnplaceableReason::SheetLimitReached`].
    pub fn nest(&self, parts: Vec<Part>) -> NestingResult {
        let run = |parts: Vec<Part>| {
            LBFOptimizer::new(parts, vec![self.config.sheet_type], self.config.lbf.clone()).solve()
        };
        let hit_limit = |r: &NestingResult| {
            r.unplaceable
                .iter()
                .any(|u| u.reason == UnplaceableReason::SheetLimitReached)
        };

        let result = run(parts.clone());
        if !hit_limit(&result) {
            return result;
        }

        let mut target = result.n_placed();
        loop {
            warn!("[PROC] sheet limit reached, retrying with {target} parts grouped by order");
            let (selected, deferred) = split_parts_by_order(parts.clone(), target);
            let mut retry = run(selected);
            if !hit_limit(&retry) || target <= 1 {
                retry
                    .unplaceable
                    .extend(deferred.iter().map(|p| UnplaceablePart {
                        part_id: p.id.clone(),
                        sku: p.source.sku.clone(),
                        order_id: p.source.order_id.clone(),
                        reason: UnplaceableReason::SheetLimitReached,
                    }));
                return retry;
            }
            target = target.div_ceil(2);
        }
    }

    /// Expands items into parts: pack multipliers, composite products, SVG outlines and
    /// rectangular products. Units without an outline are collected separately.
    pub fn expand_items(&self, items: &[NestingItem]) -> Result<PartExpansion> {
        let mut expansion = PartExpansion::default();
        let mut ids = PartIdGenerator::new();
        let mut outlines: HashMap<String, Option<PreparedOutline>> = HashMap::new();

        for (item_idx, item) in items.iter().enumerate() {
            let quantity = item.quantity * pack_multiplier(item.item_name.as_deref());
            if quantity != item.quantity {
                debug!(
                    "[PROC] {}: pack detected, quantity {} -> {}",
                    item.sku, item.quantity, quantity
                );
            }
            let foam_sheet = self.item_foam_sheet(item);

            match self.composites.expand(&item.sku) {
                Some(sub_parts) => {
                    debug!("[PROC] {} is a composite of {} parts", item.sku, sub_parts.len());
                    for sub in sub_parts {
                        let sheet = sub.foam_sheet.unwrap_or_else(|| foam_sheet.clone());
                        let unit = Unit {
                            item_idx,
                            item_name: None,
                            source: part_source(item, &sub.sku, &sheet),
                            quantity: sub.quantity * quantity,
                        };
                        self.expand_unit(unit, &mut expansion, &mut ids, &mut outlines)?;
                    }
                }
                None => {
                    let unit = Unit {
                        item_idx,
                        item_name: item.item_name.as_deref(),
                        source: part_source(item, &item.sku, &foam_sheet),
                        quantity,
                    };
                    self.expand_unit(unit, &mut expansion, &mut ids, &mut outlines)?;
                }
            }
        }
        Ok(expansion)
    }

    fn expand_unit(
        &self,
        unit: Unit,
        expansion: &mut PartExpansion,
        ids: &mut PartIdGenerator,
        outlines: &mut HashMap<String, Option<PreparedOutline>>,
    ) -> Result<()> {
        let Unit {
            item_idx,
            item_name,
            source,
            quantity,
        } = unit;
        let sku = source.sku.clone();
        if !outlines.contains_key(&sku) {
            let prepared = self.load_outline(&sku)?;
            outlines.insert(sku.clone(), prepared);
        }

        let (polygon, count) = match &outlines[&sku] {
            Some(outline) => {
                if let Some(expected) = &outline.expected {
                    record_check(&mut expansion.checks, &sku, quantity, expected, outline);
                }
                (Some(outline.polygon.clone()), quantity)
            }
            None => match rectangular_product(&sku, item_name) {
                Some(product) => match Rect::try_new(0.0, 0.0, product.width, product.height) {
                    Ok(rect) => {
                        debug!(
                            "[PROC] {sku} is cut as a {}x{} rectangle, {} per unit",
                            product.width, product.height, product.pieces
                        );
                        (Some(SPolygon::from(rect)), quantity * product.pieces)
                    }
                    Err(e) => {
                        warn!("[PROC] unusable rectangle for {sku}: {e:#}");
                        (None, quantity)
                    }
                },
                None => (None, quantity),
            },
        };

        if polygon.is_none() && count > 0 {
            warn!("[PROC] no outline for {sku}, {count} parts cannot be nested");
        }
        for _ in 0..count {
            let id = ids.next_id(&sku);
            match &polygon {
                Some(p) => {
                    let part = Part::new(id, vec![p.clone()], source.clone());
                    expansion.parts.push((item_idx, part));
                }
                None => {
                    let missing = UnplaceablePart {
                        part_id: id,
                        sku: sku.clone(),
                        order_id: source.order_id.clone(),
                        reason: UnplaceableReason::MissingOutline,
                    };
                    expansion.missing.push((item_idx, missing));
                }
            }
        }
        Ok(())
    }

    fn load_outline(&self, sku: &str) -> Result<Option<PreparedOutline>> {
        let Some(svg) = self.outlines.svg(sku)? else {
            return Ok(None);
        };
        match prepare_outline(&self.dimensions, sku, &svg) {
            Ok(prepared) => Ok(Some(prepared)),
            Err(e) => {
                warn!("[PROC] unusable SVG asset for {sku}: {e:#}");
                Ok(None)
            }
        }
    }

    /// The foam sheet of an item: as ordered, otherwise derived from its SKU
    fn item_foam_sheet(&self, item: &NestingItem) -> String {
        match item.foam_sheet.trim() {
            "" => get_foam_sheet_from_sku(&item.sku).unwrap_or_else(|| UNKNOWN_FOAM_SHEET.to_string()),
            sheet => sheet.to_string(),
        }
    }
}

/// Units of a single SKU to be turned into parts
struct Unit<'a> {
    item_idx: usize,
    item_name: Option<&'a str>,
    source: PartSource,
    quantity: usize,
}

struct SheetGroup {
    foam_sheet: String,
    item_idxs: Vec<usize>,
    parts: Vec<Part>,
    missing: Vec<UnplaceablePart>,
}

impl SheetGroup {
    fn find_or_insert<'a>(groups: &'a mut Vec<SheetGroup>, foam_sheet: &str) -> &'a mut SheetGroup {
        let idx = match groups.iter().position(|g| g.foam_sheet == foam_sheet) {
            Some(idx) => idx,
            None => {
                groups.push(SheetGroup {
                    foam_sheet: foam_sheet.to_string(),
                    item_idxs: vec![],
                    parts: vec![],
                    missing: vec![],
                });
                groups.len() - 1
            }
        };
        &mut groups[idx]
    }
}

fn part_source(item: &NestingItem, sku: &str, foam_sheet: &str) -> PartSource {
    PartSource {
        order_id: item.order_id.clone(),
        customer_name: item.customer_name.clone(),
        sku: sku.to_string(),
        foam_sheet: foam_sheet.to_string(),
        priority: item.priority,
    }
}

fn record_check(
    checks: &mut Vec<DimensionCheck>,
    sku: &str,
    n_parts: usize,
    expected: &ExpectedDimensions,
    outline: &PreparedOutline,
) {
    match checks.iter_mut().find(|c| c.sku == sku) {
        Some(check) => check.n_parts += n_parts,
        None => checks.push(DimensionCheck {
            sku: sku.to_string(),
            n_parts,
            expected: Some(expected.clone()),
            actual_width: outline.width(),
            actual_height: outline.height(),
        }),
    }
}
