use itertools::Itertools;

use crate::svg_validation::{DIMENSION_TOLERANCE_PERCENT, ExpectedDimensions};

/// Size of the outline used for a SKU, next to the size it is expected to have
#[derive(Clone, Debug, PartialEq)]
pub struct DimensionCheck {
    pub sku: String,
    pub n_parts: usize,
    pub expected: Option<ExpectedDimensions>,
    pub actual_width: f64,
    pub actual_height: f64,
}

impl DimensionCheck {
    /// Deviation from the expected size in percent, per axis
    pub fn diff_percent(&self) -> Option<(f64, f64)> {
        self.expected.as_ref().map(|e| {
            (
                (self.actual_width - e.width).abs() / e.width * 100.0,
                (self.actual_height - e.height).abs() / e.height * 100.0,
            )
        })
    }
}

/// Renders the outline size checks of a nesting batch, `total_parts` being all parts of the batch
pub fn generate_dimension_check_report(checks: &[DimensionCheck], total_parts: usize) -> String {
    let mut lines = vec![
        "🔍 Nesting Dimension Validation Report".to_string(),
        "=".repeat(50),
        String::new(),
    ];

    for (i, check) in checks.iter().enumerate() {
        lines.push(format!("{}. {} ({} parts)", i + 1, check.sku, check.n_parts));
        if let (Some(e), Some((w_pct, h_pct))) = (&check.expected, check.diff_percent()) {
            lines.push(format!("   Expected: {}mm × {}mm", e.width, e.height));
            lines.push(format!(
                "   Actual: {:.2}mm × {:.2}mm",
                check.actual_width, check.actual_height
            ));
            if w_pct <= DIMENSION_TOLERANCE_PERCENT && h_pct <= DIMENSION_TOLERANCE_PERCENT {
                lines.push("   ✅ Dimensions within tolerance (≤5%)".to_string());
            } else {
                lines.push("   ⚠️  Dimensions outside tolerance:".to_string());
                lines.push(format!("      Width difference: {w_pct:.1}%"));
                lines.push(format!("      Height difference: {h_pct:.1}%"));
            }
        }
        lines.push(String::new());
    }

    let n_validated: usize = checks.iter().map(|c| c.n_parts).sum();
    lines.push(format!("Summary: {n_validated}/{total_parts} parts validated"));
    lines.into_iter().join("\n")
}
