//! Products that are nested without an SVG outline, and pack sizes encoded in item names

use std::sync::LazyLock;

use regex::Regex;

static CUSTOM_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*mm\s*[x×]\s*(\d+(?:\.\d+)?)\s*mm").unwrap()
});

static PACK_OF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(\s*pack\s+of\s+(\d+)\s*\)").unwrap());

/// Sheets in a retail pack are always cut at this size
pub const RETAIL_PACK_SIZE: (f64, f64) = (600.0, 420.0);
/// Sheets in a starter kit are always cut at this size
pub const STARTER_KIT_SIZE: (f64, f64) = (420.0, 600.0);
/// A starter kit holds this many sheets
pub const STARTER_KIT_SHEETS: usize = 3;

/// Multiplier for items sold as twin or triple packs, based on the item name
pub fn pack_multiplier(item_name: Option<&str>) -> usize {
    let Some(name) = item_name.map(str::to_lowercase) else {
        return 1;
    };
    let contains_any = |variants: &[&str]| variants.iter().any(|v| name.contains(v));
    if contains_any(&["twin pack", "twinpack", "twin-pack"]) {
        2
    } else if contains_any(&["triple pack", "triplepack", "triple-pack"]) {
        3
    } else {
        1
    }
}

/// A product cut as a plain rectangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectangularProduct {
    pub width: f64,
    pub height: f64,
    /// Number of rectangles per ordered unit
    pub pieces: usize,
}

/// Recognizes products that are cut as plain rectangles:
/// custom-size sheets (`SFC…`, size taken from the item name), retail packs (`SFP…`) and
/// starter kits (`SFSK…`).
///
/// Returns `None` for every other SKU, and for custom-size sheets without a readable, positive size.
pub fn rectangular_product(sku: &str, item_name: Option<&str>) -> Option<RectangularProduct> {
    if sku.starts_with("SFC") {
        let caps = CUSTOM_SIZE.captures(item_name?)?;
        let width = caps[1].parse::<f64>().ok()?;
        let height = caps[2].parse::<f64>().ok()?;
        if !(width > 0.0 && height > 0.0) {
            return None;
        }
        return Some(RectangularProduct {
            width,
            height,
            pieces: 1,
        });
    }
    if sku.starts_with("SFP") {
        let pieces = item_name
            .and_then(|name| PACK_OF.captures(name))
            .and_then(|caps| caps[1].parse::<usize>().ok())
            .unwrap_or(1);
        return Some(RectangularProduct {
            width: RETAIL_PACK_SIZE.0,
            height: RETAIL_PACK_SIZE.1,
            pieces,
        });
    }
    //mixed packs have a per-depth size table that is not available
    if sku.starts_with("SFSK") && !sku.starts_with("SFSKMP") {
        return Some(RectangularProduct {
            width: STARTER_KIT_SIZE.0,
            height: STARTER_KIT_SIZE.1,
            pieces: STARTER_KIT_SHEETS,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None, 1)]
    #[test_case(Some("Drill Insert"), 1)]
    #[test_case(Some("Drill Insert - Twin Pack"), 2)]
    #[test_case(Some("Drill Insert TWINPACK"), 2)]
    #[test_case(Some("Drill Insert (triple-pack)"), 3)]
    #[test_case(Some("twin pack of triple pack"), 2; "twin is checked first")]
    fn pack_multipliers(name: Option<&str>, expected: usize) {
        assert_eq!(pack_multiplier(name), expected);
    }

    #[test]
    fn custom_sizes_come_from_the_name() {
        let p = rectangular_product("SFC30K", Some("Custom Foam 450mm x 320.5mm Black")).unwrap();
        assert_eq!((p.width, p.height, p.pieces), (450.0, 320.5, 1));
        assert!(rectangular_product("SFC30K", Some("Custom Foam")).is_none());
        assert!(rectangular_product("SFC30K", None).is_none());
        assert!(rectangular_product("SFC30K", Some("Custom 0mm x 100mm")).is_none());
    }

    #[test]
    fn packs_and_kits() {
        let pack = rectangular_product("SFP30K", Some("Foam Sheets (Pack of 5)")).unwrap();
        assert_eq!((pack.width, pack.height, pack.pieces), (600.0, 420.0, 5));
        let single = rectangular_product("SFP30K", Some("Foam Sheet")).unwrap();
        assert_eq!(single.pieces, 1);

        let kit = rectangular_product("SFSK30B", None).unwrap();
        assert_eq!((kit.width, kit.height, kit.pieces), (420.0, 600.0, 3));

        assert!(rectangular_product("SFSKMP30B", None).is_none());
        assert!(rectangular_product("SFI-MTC2", None).is_none());
    }
}
