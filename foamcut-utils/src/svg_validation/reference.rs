use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

const EMBEDDED_DIMENSIONS: &str = include_str!("../../../assets/expected_dimensions.json");

/// Size in millimetres a product's outline is supposed to have
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExpectedDimensions {
    pub sku: String,
    pub width: f64,
    pub height: f64,
}

/// Reference table of [`ExpectedDimensions`], keyed by SKU
#[derive(Clone, Debug, Default)]
pub struct DimensionTable {
    entries: HashMap<String, ExpectedDimensions>,
}

impl DimensionTable {
    /// The table shipped with the crate
    pub fn embedded() -> Result<Self> {
        Self::from_reader(EMBEDDED_DIMENSIONS.as_bytes()).context("embedded dimension table")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("could not open dimension table: {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("could not read dimension table: {}", path.display()))
    }

    /// Reads a JSON array of `{sku, width, height}` records.
    /// Later records replace earlier ones with the same SKU.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let records: Vec<ExpectedDimensions> = serde_json::from_reader(reader)?;
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<ExpectedDimensions>) -> Result<Self> {
        let mut entries = HashMap::with_capacity(records.len());
        for r in records {
            ensure!(
                r.width > 0.0 && r.height > 0.0,
                "expected dimensions of {} must be positive, got {}x{}",
                r.sku,
                r.width,
                r.height
            );
            entries.insert(r.sku.clone(), r);
        }
        Ok(DimensionTable { entries })
    }

    pub fn get(&self, sku: &str) -> Option<&ExpectedDimensions> {
        self.entries.get(sku)
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.entries.contains_key(sku)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_loads() {
        let table = DimensionTable::embedded().unwrap();
        assert!(!table.is_empty());
        let fsys = table.get("SFI-FSYS12").unwrap();
        assert!(fsys.width > 0.0 && fsys.height > 0.0);
        assert!(table.get("NOT-A-SKU").is_none());
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        let json = r#"[{"sku": "A", "width": 10, "height": 0}]"#;
        assert!(DimensionTable::from_reader(json.as_bytes()).is_err());
    }
}
