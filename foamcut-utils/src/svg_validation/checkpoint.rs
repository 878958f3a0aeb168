//! Validation of a whole set of SVG assets, as run before assets are released for cutting

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::svg_validation::{
    DimensionTable, ValidationResult, batch_validate_svgs, generate_validation_report,
};

/// An asset to validate, `path` is relative to the manifest's directory unless absolute
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ManifestEntry {
    pub sku: String,
    pub path: PathBuf,
}

/// Reads all `*.svg` files of `folder` as `(sku, svg)` pairs, the SKU being the file stem.
/// Files are returned sorted by name.
pub fn read_svg_folder(folder: &Path) -> Result<Vec<(String, String)>> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("could not read SVG folder: {}", folder.display()))?;
    let mut paths = vec![];
    for entry in entries {
        let path = entry?.path();
        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        if path.is_file() && is_svg {
            paths.push(path);
        }
    }

    paths
        .into_iter()
        .sorted()
        .map(|path| {
            let sku = path
                .file_stem()
                .and_then(|s| s.to_str())
                .with_context(|| format!("invalid file name: {}", path.display()))?
                .to_string();
            let svg = fs::read_to_string(&path)
                .with_context(|| format!("could not read SVG: {}", path.display()))?;
            Ok((sku, svg))
        })
        .collect()
}

pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("could not read manifest: {}", path.display()))?;
    serde_json::from_str(&content).context("incorrect manifest format")
}

/// Validates every SVG in `folder`
pub fn check_folder(table: &DimensionTable, folder: &Path) -> Result<Vec<ValidationResult>> {
    let svgs = read_svg_folder(folder)?;
    info!("[CHECK] validating {} SVGs in {}", svgs.len(), folder.display());
    Ok(batch_validate_svgs(table, &svgs))
}

/// Validates the assets listed in a manifest, in manifest order.
/// Listed files that do not exist are reported as failed results.
pub fn check_manifest(
    table: &DimensionTable,
    entries: &[ManifestEntry],
    base_dir: &Path,
) -> Result<Vec<ValidationResult>> {
    info!("[CHECK] validating {} SVGs from manifest", entries.len());
    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = base_dir.join(&entry.path);
        if !path.is_file() {
            warn!("[CHECK] {}: file not found: {}", entry.sku, path.display());
            results.push(ValidationResult::failed(&entry.sku, "File not found"));
            continue;
        }
        let svg = fs::read_to_string(&path)
            .with_context(|| format!("could not read SVG: {}", path.display()))?;
        results.extend(batch_validate_svgs(table, &[(entry.sku.clone(), svg)]));
    }
    Ok(results)
}

/// Writes the validation report of `results` to `out`, followed by a newline
pub fn write_report(out: &mut impl Write, results: &[ValidationResult]) -> Result<()> {
    writeln!(out, "{}", generate_validation_report(results))?;
    out.flush()?;
    Ok(())
}
