//! SKU rules of the product catalogue: composite products and foam sheet codes

use std::collections::HashMap;
use std::io::Read;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;

const EMBEDDED_COMPOSITES: &str = include_str!("../../../assets/composite_skus.json");

/// Foam sheets of retail packs, identified by their barcode
const RETAIL_PACK_SHEETS: [(&str, &str); 12] = [
    ("0604565193520", "Red 30mm"),
    ("0604565193544", "Blue 30mm"),
    ("0604565344892", "Yellow 30mm"),
    ("0604565344878", "Orange 30mm"),
    ("0604565344946", "Black 30mm"),
    ("0604565345097", "Black 50mm"),
    ("0604565345042", "Yellow 50mm"),
    ("0604565344960", "Red 50mm"),
    ("0604565344984", "Blue 50mm"),
    ("0604565345028", "Orange 50mm"),
    ("0604565345004", "Green 50mm"),
    ("0604565193568", "Green 30mm"),
];

fn sheet_color(code: char) -> Option<&'static str> {
    match code {
        'B' => Some("Blue"),
        'K' => Some("Black"),
        'R' => Some("Red"),
        'O' => Some("Orange"),
        'M' => Some("Pink"),
        'P' => Some("Purple"),
        'E' => Some("Grey"),
        'T' => Some("Teal"),
        'Y' => Some("Yellow"),
        'G' => Some("Green"),
        _ => None,
    }
}

/// Foam sheet (`"{color} {depth}"`) a product is cut from, derived from its SKU.
///
/// Retail packs are looked up by barcode. Other products follow `SF…{depth}{color}`, with a two
/// digit depth code and a one letter color code. Depth codes 20 and 40 denote 30mm and 50mm sheets.
pub fn get_foam_sheet_from_sku(sku: &str) -> Option<String> {
    if let Some((_, sheet)) = RETAIL_PACK_SHEETS.iter().find(|(code, _)| *code == sku) {
        return Some(sheet.to_string());
    }

    let chars: Vec<char> = sku.chars().collect();
    if chars.len() < 3 || !sku.starts_with("SF") {
        return None;
    }
    let color = sheet_color(chars[chars.len() - 1])?;
    let depth_code = &chars[chars.len() - 3..chars.len() - 1];
    if !depth_code.iter().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let depth = match depth_code.iter().collect::<String>().as_str() {
        "20" => "30".to_string(),
        "40" => "50".to_string(),
        d => d.to_string(),
    };
    Some(format!("{color} {depth}mm"))
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SubPartSpec {
    pub sku: String,
    pub quantity: usize,
}

/// A component of a composite product, with its quantity per unit of the composite
#[derive(Clone, Debug, PartialEq)]
pub struct SubPart {
    pub sku: String,
    pub quantity: usize,
    /// Sheet the component is cut from when it differs from the ordered item's sheet
    pub foam_sheet: Option<String>,
}

/// Composite products, which are nested as a set of separately cut components
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompositeCatalogue {
    composites: HashMap<String, Vec<SubPartSpec>>,
    /// Composites ordered as `{base}{color letter}`, whose components each have their own depth
    #[serde(default)]
    color_coded: Vec<String>,
    #[serde(default)]
    depth_assignments: HashMap<String, u32>,
    #[serde(default)]
    color_codes: HashMap<String, String>,
}

impl CompositeCatalogue {
    pub fn embedded() -> Result<Self> {
        Self::from_reader(EMBEDDED_COMPOSITES.as_bytes()).context("embedded composite catalogue")
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn is_sub_part(&self, sku: &str) -> bool {
        self.composites
            .values()
            .any(|subs| subs.iter().any(|s| s.sku == sku))
    }

    pub fn is_color_coded(&self, sku: &str) -> bool {
        self.color_coded
            .iter()
            .any(|base| sku.starts_with(base.as_str()) && sku.len() == base.len() + 1)
    }

    /// Components of `sku` if it is a composite product.
    ///
    /// A SKU that is itself a component is never a composite. Color-coded composites resolve the
    /// sheet of every component from the color letter and the component's depth. Other composites are
    /// looked up with the last three characters (the size/color suffix) stripped.
    pub fn expand(&self, sku: &str) -> Option<Vec<SubPart>> {
        if self.is_sub_part(sku) {
            debug!("{sku} is a component itself, not treating it as composite");
            return None;
        }

        if self.is_color_coded(sku) {
            let base = &sku[..sku.len() - 1];
            let subs = self.composites.get(base)?;
            let color = sku
                .chars()
                .last()
                .map(|c| c.to_ascii_uppercase().to_string())
                .and_then(|c| self.color_codes.get(&c));
            return match color {
                Some(color) => Some(
                    subs.iter()
                        .map(|s| SubPart {
                            sku: s.sku.clone(),
                            quantity: s.quantity,
                            foam_sheet: self
                                .depth_assignments
                                .get(&s.sku)
                                .map(|depth| format!("{color} {depth}mm")),
                        })
                        .collect(),
                ),
                None => {
                    warn!("unknown color code in composite SKU {sku}");
                    Some(plain(subs))
                }
            };
        }

        let normalized = match sku.len() {
            n if n >= 3 => sku.get(..n - 3)?,
            _ => sku,
        };
        self.composites.get(normalized).map(|subs| plain(subs))
    }
}

fn plain(subs: &[SubPartSpec]) -> Vec<SubPart> {
    subs.iter()
        .map(|s| SubPart {
            sku: s.sku.clone(),
            quantity: s.quantity,
            foam_sheet: None,
        })
        .collect()
}
