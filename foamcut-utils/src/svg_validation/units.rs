//! Conversion of SVG length units to millimetres

/// Millimetres per CSS pixel (96 px per inch)
pub const PX_TO_MM: f64 = 0.264583;

/// Converts `value` expressed in `unit` to millimetres.
/// Units are matched case-insensitively, unknown or empty units are treated as pixels.
pub fn convert_to_mm(value: f64, unit: &str) -> f64 {
    value * mm_per_unit(unit)
}

fn mm_per_unit(unit: &str) -> f64 {
    match unit.to_ascii_lowercase().as_str() {
        "mm" => 1.0,
        "cm" => 10.0,
        "in" => 25.4,
        "pt" => 0.352778,
        "pc" => 4.233333,
        _ => PX_TO_MM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use test_case::test_case;

    #[test_case(10.0, "cm", 100.0; "centimetres")]
    #[test_case(1.0, "in", 25.4; "inches")]
    #[test_case(1.0, "IN", 25.4; "case insensitive")]
    #[test_case(42.0, "mm", 42.0; "millimetres")]
    #[test_case(100.0, "px", 26.4583; "pixels")]
    #[test_case(100.0, "furlong", 26.4583; "unknown unit")]
    #[test_case(100.0, "", 26.4583; "empty unit")]
    fn converts_to_mm(value: f64, unit: &str, expected: f64) {
        assert_approx_eq!(f64, convert_to_mm(value, unit), expected, epsilon = 1e-9);
    }
}
