use itertools::Itertools;

use crate::svg_validation::ValidationResult;

/// Renders validation results as a human readable text report
pub fn generate_validation_report(results: &[ValidationResult]) -> String {
    let mut lines = vec![
        "SVG Dimension Validation Report".to_string(),
        "=".repeat(40),
        String::new(),
    ];

    let n_valid = results.iter().filter(|r| r.is_valid).count();
    lines.push(format!(
        "Overall Status: {}/{} SVGs passed validation",
        n_valid,
        results.len()
    ));
    lines.push(String::new());

    for (i, r) in results.iter().enumerate() {
        let status = match r.is_valid {
            true => "✅ PASS",
            false => "❌ FAIL",
        };
        let (exp, act) = (&r.expected_dimensions, &r.actual_dimensions);
        lines.push(format!("{}. {} - {}", i + 1, exp.sku, status));
        lines.push(format!("   Expected: {}mm × {}mm", exp.width, exp.height));
        lines.push(format!(
            "   Actual: {:.2}{} × {:.2}{}",
            act.width, act.unit, act.height, act.unit
        ));

        if !r.is_valid {
            let diff = &r.dimension_difference;
            lines.push(format!("   Width difference: {:.1}%", diff.width_diff_percent));
            lines.push(format!("   Height difference: {:.1}%", diff.height_diff_percent));
            if !r.recommendations.is_empty() {
                lines.push("   Recommendations:".to_string());
                lines.extend(r.recommendations.iter().map(|rec| format!("     • {rec}")));
            }
        }
        lines.push(String::new());
    }

    lines.into_iter().join("\n")
}
