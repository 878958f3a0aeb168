use std::collections::HashMap;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::debug;

use crate::entities::{Part, PartSource, SheetType};
use crate::geometry::primitives::{Point, Rect, SPolygon};
use crate::io::ext_repr::{ExtItem, ExtNestingInstance, ExtSPolygon, ExtShape};

/// Hands out part ids of the form `{sku}_{n}`, with `n` counting up per SKU starting at 1.
#[derive(Debug, Default, Clone)]
pub struct PartIdGenerator {
    counters: HashMap<String, usize>,
}

impl PartIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, sku: &str) -> String {
        let n = self.counters.entry(sku.to_string()).or_insert(0);
        *n += 1;
        format!("{sku}_{n}")
    }
}

pub fn import_simple_polygon(sp: &ExtSPolygon) -> Result<SPolygon> {
    let mut points = sp.0.iter().map(|(x, y)| Point(*x, *y)).collect_vec();
    //remove the closing vertex if the polygon is explicitly closed
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    SPolygon::new(points)
}

pub fn import_shape(shape: &ExtShape) -> Result<SPolygon> {
    match shape {
        ExtShape::Rectangle {
            x_min,
            y_min,
            width,
            height,
        } => {
            let rect = Rect::try_new(*x_min, *y_min, x_min + width, y_min + height)?;
            Ok(SPolygon::from(rect))
        }
        ExtShape::SimplePolygon(esp) => import_simple_polygon(esp),
    }
}

/// Expands an item into `quantity` parts sharing the same outline.
pub fn import_item(ext_item: &ExtItem, ids: &mut PartIdGenerator) -> Result<Vec<Part>> {
    let outline = import_shape(&ext_item.shape)
        .with_context(|| format!("invalid shape for sku {}", ext_item.sku))?;
    let source = PartSource {
        order_id: ext_item.order_id.clone(),
        customer_name: ext_item.customer_name.clone(),
        sku: ext_item.sku.clone(),
        foam_sheet: ext_item.foam_sheet.clone(),
        priority: ext_item.priority,
    };
    let parts = (0..ext_item.quantity)
        .map(|_| {
            Part::new(
                ids.next_id(&ext_item.sku),
                vec![outline.clone()],
                source.clone(),
            )
        })
        .collect_vec();
    debug!("[IMPORT] {} x {} imported", parts.len(), ext_item.sku);
    Ok(parts)
}

/// Converts an instance into the parts to nest and the sheet types to nest them on.
pub fn import_instance(ext: &ExtNestingInstance) -> Result<(Vec<Part>, Vec<SheetType>)> {
    anyhow::ensure!(
        !ext.sheet_types.is_empty(),
        "instance {} has no sheet types",
        ext.name
    );
    let mut ids = PartIdGenerator::new();
    let mut parts = vec![];
    for item in ext.items.iter() {
        parts.extend(import_item(item, &mut ids)?);
    }
    Ok((parts, ext.sheet_types.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_ids_count_per_sku() {
        let mut ids = PartIdGenerator::new();
        assert_eq!(ids.next_id("A"), "A_1");
        assert_eq!(ids.next_id("B"), "B_1");
        assert_eq!(ids.next_id("A"), "A_2");
    }

    #[test]
    fn closed_polygon_is_opened() {
        let esp = ExtSPolygon(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 0.0)]);
        assert_eq!(import_simple_polygon(&esp).unwrap().n_points(), 3);
    }
}
