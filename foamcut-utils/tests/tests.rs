#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use anyhow::Result;
    use float_cmp::assert_approx_eq;
    use itertools::Itertools;
    use test_case::test_case;

    use foamcut::entities::{NestingItem, SheetType, UnplaceableReason};
    use foamcut_utils::nesting::{CompositeCatalogue, NestingProcessor, ProcessorConfig};
    use foamcut_utils::svg_validation::checkpoint::{ManifestEntry, check_manifest, write_report};
    use foamcut_utils::svg_validation::{
        DimensionTable, ExpectedDimensions, ValidationError, calculate_path_bounds,
        extract_svg_dimensions, generate_validation_report, validate_svg_dimensions,
    };
    use lbf::config::LBFConfig;

    fn init_logger() {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Debug)
            .try_init();
    }

    fn rect_svg(w: f64, h: f64) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">
  <path d="M 0 0 L {w} 0 L {w} {h} L 0 {h} Z"/>
</svg>"#
        )
    }

    fn expected(sku: &str, width: f64, height: f64) -> ExpectedDimensions {
        ExpectedDimensions {
            sku: sku.to_string(),
            width,
            height,
        }
    }

    fn item(order: &str, sku: &str, quantity: usize, foam_sheet: &str) -> NestingItem {
        NestingItem {
            order_id: order.to_string(),
            customer_name: format!("customer of {order}"),
            sku: sku.to_string(),
            quantity,
            foam_sheet: foam_sheet.to_string(),
            item_name: None,
            priority: None,
        }
    }

    const CATALOGUE: &str = r#"{
        "composites": {
            "SFI-KIT": [
                { "sku": "SFI-K1", "quantity": 2 },
                { "sku": "SFI-K2", "quantity": 1 }
            ],
            "SFI-NUP": [
                { "sku": "SFI-N1", "quantity": 1 },
                { "sku": "SFI-N2", "quantity": 1 }
            ]
        },
        "colorCoded": ["SFI-NUP"],
        "depthAssignments": { "SFI-N1": 50, "SFI-N2": 30 },
        "colorCodes": { "O": "Orange" }
    }"#;

    fn processor(
        sheet_type: SheetType,
        max_sheets: Option<usize>,
    ) -> Result<NestingProcessor<HashMap<String, String>>> {
        let table = DimensionTable::from_records(vec![
            expected("SFI-A", 100.0, 50.0),
            expected("SFI-K1", 80.0, 40.0),
        ])?;
        let outlines: HashMap<String, String> = [
            ("SFI-A", rect_svg(100.0, 50.0)),
            ("SFI-B", rect_svg(60.0, 60.0)),
            ("SFI-K1", rect_svg(80.0, 40.0)),
            ("SFI-K2", rect_svg(30.0, 30.0)),
            ("SFI-N1", rect_svg(40.0, 20.0)),
            ("SFI-N2", rect_svg(20.0, 20.0)),
        ]
        .into_iter()
        .map(|(sku, svg)| (sku.to_string(), svg))
        .collect();

        let config = ProcessorConfig {
            sheet_type,
            lbf: LBFConfig {
                rotations: vec![0.0],
                max_sheets,
                ..LBFConfig::default()
            },
        };
        NestingProcessor::new(
            config,
            table,
            CompositeCatalogue::from_reader(CATALOGUE.as_bytes())?,
            outlines,
        )
    }

    #[test]
    fn viewbox_only_svg_reports_viewbox_size() {
        let dims = extract_svg_dimensions(r#"<svg viewBox="0 0 100 200"></svg>"#);
        assert_eq!(dims.width, 100.0);
        assert_eq!(dims.height, 200.0);
        assert_eq!(dims.unit, "viewBox");
    }

    #[test]
    fn path_bounds_of_longest_path() {
        let svg = r#"<svg viewBox="0 0 500 500">
            <path d="M 0 0 L 1 1"/>
            <path d="M 10 10 L 60 10 L 60 90 L 10 90 Z"/>
        </svg>"#;
        let bounds = calculate_path_bounds(svg).unwrap();
        assert_approx_eq!(f64, bounds.width, 50.0);
        assert_approx_eq!(f64, bounds.height, 80.0);
    }

    #[test_case("105mm", true; "exactly at tolerance")]
    #[test_case("105.001mm", false; "just above tolerance")]
    #[test_case("95mm", true; "below by tolerance")]
    fn tolerance_boundary(width: &str, valid: bool) -> Result<()> {
        let table = DimensionTable::from_records(vec![expected("SFI-T", 100.0, 100.0)])?;
        let svg = format!(r#"<svg width="{width}" height="100mm"></svg>"#);
        let res = validate_svg_dimensions(&table, "SFI-T", &svg)?;
        assert_eq!(res.is_valid, valid);
        assert_eq!(res.recommendations.is_empty(), valid);
        Ok(())
    }

    #[test]
    fn unknown_sku_is_an_error() -> Result<()> {
        let table = DimensionTable::from_records(vec![expected("SFI-T", 100.0, 100.0)])?;
        let err = validate_svg_dimensions(&table, "SFI-NOPE", &rect_svg(1.0, 1.0)).unwrap_err();
        assert_eq!(err, ValidationError::UnknownSku("SFI-NOPE".to_string()));
        Ok(())
    }

    #[test]
    fn embedded_reference_table_is_complete() -> Result<()> {
        let table = DimensionTable::embedded()?;
        assert!(!table.is_empty());
        assert!(table.contains("SFI-MTC2"));
        let fsys = table.get("SFI-FSYS12").unwrap();
        assert_approx_eq!(f64, fsys.width, 384.702);
        assert_approx_eq!(f64, fsys.height, 280.852);
        Ok(())
    }

    #[test]
    fn manifest_with_missing_file() -> Result<()> {
        let table = DimensionTable::from_records(vec![expected("SFI-T", 100.0, 100.0)])?;
        let entries = vec![ManifestEntry {
            sku: "SFI-T".to_string(),
            path: "does/not/exist.svg".into(),
        }];
        let results = check_manifest(&table, &entries, std::env::temp_dir().as_path())?;
        assert_eq!(results.len(), 1);
        assert!(!results[0].is_valid);
        assert_eq!(results[0].recommendations, vec!["File not found".to_string()]);
        assert!(generate_validation_report(&results).contains("Overall Status: 0/1 SVGs passed validation"));
        Ok(())
    }

    #[test]
    fn written_report_is_exactly_the_report() -> Result<()> {
        let table = DimensionTable::from_records(vec![expected("SFI-T", 100.0, 50.0)])?;
        let results = vec![validate_svg_dimensions(&table, "SFI-T", &rect_svg(100.0, 50.0))?];

        let mut out: Vec<u8> = vec![];
        write_report(&mut out, &results)?;
        let written = String::from_utf8(out)?;
        assert_eq!(written, format!("{}\n", generate_validation_report(&results)));
        assert!(written.starts_with("SVG Dimension Validation Report\n"));
        Ok(())
    }

    #[test]
    fn pack_multiplier_and_ids() -> Result<()> {
        init_logger();
        let processor = processor(SheetType::new(1000.0, 500.0), None)?;
        let mut twin = item("ORD-1", "SFI-A", 2, "Black 30mm");
        twin.item_name = Some("Drill Insert - Twin Pack".to_string());

        let expansion = processor.expand_items(&[twin])?;
        let ids = expansion.parts.iter().map(|(_, p)| p.id.as_str()).collect_vec();
        assert_eq!(ids, vec!["SFI-A_1", "SFI-A_2", "SFI-A_3", "SFI-A_4"]);
        assert_eq!(expansion.checks.len(), 1);
        assert_eq!(expansion.checks[0].n_parts, 4);
        assert_approx_eq!(f64, expansion.checks[0].actual_width, 100.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn composite_is_expanded_into_components() -> Result<()> {
        init_logger();
        let processor = processor(SheetType::new(1000.0, 500.0), None)?;
        let expansion = processor.expand_items(&[item("ORD-1", "SFI-KIT30K", 2, "Black 30mm")])?;

        let skus = expansion
            .parts
            .iter()
            .map(|(_, p)| p.source.sku.as_str())
            .counts();
        assert_eq!(skus["SFI-K1"], 4);
        assert_eq!(skus["SFI-K2"], 2);
        assert!(expansion.missing.is_empty());
        assert!(
            expansion
                .parts
                .iter()
                .all(|(i, p)| *i == 0 && p.source.foam_sheet == "Black 30mm")
        );
        Ok(())
    }

    #[test]
    fn color_coded_composite_is_split_over_sheets() -> Result<()> {
        init_logger();
        let processor = processor(SheetType::new(1000.0, 500.0), None)?;
        let processed = processor.process(&[item("ORD-1", "SFI-NUPO", 1, "")])?;

        let sheets = processed.iter().map(|p| p.foam_sheet.as_str()).collect_vec();
        assert_eq!(sheets, vec!["Orange 50mm", "Orange 30mm"]);
        for group in processed.iter() {
            assert_eq!(group.items.len(), 1);
            assert_eq!(group.nesting_result.n_placed(), 1);
        }
        Ok(())
    }

    #[test]
    fn retail_packs_are_nested_as_rectangles() -> Result<()> {
        init_logger();
        let processor = processor(SheetType::new(980.0, 1980.0), None)?;
        let mut pack = item("ORD-1", "SFP30K", 1, "");
        pack.item_name = Some("Foam Sheets (Pack of 3)".to_string());

        let processed = processor.process(&[pack])?;
        assert_eq!(processed.len(), 1);
        let result = &processed[0].nesting_result;
        assert_eq!(result.n_placed(), 3);
        assert!(result.unplaceable.is_empty());
        for part in result.placements.iter().flat_map(|s| s.parts.iter()) {
            let bbox = part.placed_bbox().unwrap();
            assert_approx_eq!(f64, bbox.width(), 600.0, epsilon = 1e-6);
            assert_approx_eq!(f64, bbox.height(), 420.0, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn zero_size_custom_sheet_does_not_abort_batch() -> Result<()> {
        init_logger();
        let processor = processor(SheetType::new(980.0, 1980.0), None)?;
        let mut pack = item("ORD-1", "SFP30K", 1, "");
        pack.item_name = Some("Foam Sheet".to_string());
        let mut custom = item("ORD-2", "SFC30K", 1, "");
        custom.item_name = Some("Custom 0mm x 100mm".to_string());

        let processed = processor.process(&[pack, custom])?;
        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].foam_sheet, "Black 30mm");
        let result = &processed[0].nesting_result;
        assert_eq!(result.n_placed(), 1);
        assert_eq!(result.placements[0].parts[0].source.sku, "SFP30K");
        assert_eq!(result.unplaceable.len(), 1);
        let bad = &result.unplaceable[0];
        assert_eq!((bad.sku.as_str(), bad.order_id.as_str()), ("SFC30K", "ORD-2"));
        assert_eq!(bad.reason, UnplaceableReason::MissingOutline);
        Ok(())
    }

    #[test]
    fn missing_outlines_are_reported() -> Result<()> {
        init_logger();
        let processor = processor(SheetType::new(1000.0, 500.0), None)?;
        let items = vec![
            item("ORD-1", "SFI-A", 1, "Black 30mm"),
            item("ORD-2", "SFI-NONE", 2, "Black 30mm"),
        ];
        let processed = processor.process(&items)?;

        assert_eq!(processed.len(), 1);
        let group = &processed[0];
        assert_eq!(group.items.len(), 2);
        assert_eq!(group.nesting_result.n_placed(), 1);
        assert_eq!(group.nesting_result.unplaceable.len(), 2);
        for u in group.nesting_result.unplaceable.iter() {
            assert_eq!(u.reason, UnplaceableReason::MissingOutline);
            assert_eq!(u.order_id, "ORD-2");
        }
        Ok(())
    }

    #[test]
    fn items_are_grouped_by_foam_sheet() -> Result<()> {
        init_logger();
        let processor = processor(SheetType::new(1000.0, 500.0), None)?;
        let items = vec![
            item("ORD-1", "SFI-A", 1, "Blue 50mm"),
            item("ORD-2", "SFI-B", 1, "Black 30mm"),
            item("ORD-3", "SFI-A", 1, "Blue 50mm"),
            item("ORD-4", "SFI-B20R", 1, ""),
        ];
        let processed = processor.process(&items)?;

        let sheets = processed.iter().map(|p| p.foam_sheet.as_str()).collect_vec();
        assert_eq!(sheets, vec!["Blue 50mm", "Black 30mm", "Red 30mm"]);
        let orders = processed[0].items.iter().map(|i| i.order_id.as_str()).collect_vec();
        assert_eq!(orders, vec!["ORD-1", "ORD-3"]);
        assert_eq!(processed[0].nesting_result.n_placed(), 2);
        //no outline for SFI-B20R, it still gets a group of its own
        assert_eq!(
            processed[2].nesting_result.unplaceable[0].reason,
            UnplaceableReason::MissingOutline
        );
        Ok(())
    }

    #[test]
    fn sheet_limit_keeps_urgent_orders_whole() -> Result<()> {
        init_logger();
        //a single 60x60 part fills a 100x100 sheet
        let processor = processor(SheetType::new(100.0, 100.0), Some(1))?;
        let mut relaxed = item("ORD-A", "SFI-B", 2, "Black 30mm");
        relaxed.priority = Some(5);
        let mut urgent = item("ORD-B", "SFI-B", 1, "Black 30mm");
        urgent.priority = Some(1);

        let processed = processor.process(&[relaxed, urgent])?;
        let result = &processed[0].nesting_result;

        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.n_placed(), 1);
        assert_eq!(result.placements[0].parts[0].source.order_id, "ORD-B");
        assert_eq!(result.unplaceable.len(), 2);
        for u in result.unplaceable.iter() {
            assert_eq!(u.reason, UnplaceableReason::SheetLimitReached);
            assert_eq!(u.order_id, "ORD-A");
        }
        Ok(())
    }

    #[test]
    fn nested_parts_do_not_overlap() -> Result<()> {
        init_logger();
        let processor = processor(SheetType::new(400.0, 300.0), None)?;
        let items = vec![
            item("ORD-1", "SFI-A", 5, "Black 30mm"),
            item("ORD-2", "SFI-B", 7, "Black 30mm"),
            item("ORD-3", "SFI-KIT30K", 3, "Black 30mm"),
        ];
        let processed = processor.process(&items)?;
        let result = &processed[0].nesting_result;
        assert_eq!(result.n_placed(), 5 + 7 + 3 * 3);
        assert!(result.unplaceable.is_empty());

        for sheet in result.placements.iter() {
            for part in sheet.parts.iter() {
                let bbox = part.placed_bbox().unwrap();
                assert!(bbox.x_min >= -1e-6 && bbox.y_min >= -1e-6);
                assert!(bbox.x_max <= sheet.width + 1e-6 && bbox.y_max <= sheet.height + 1e-6);
            }
            for (a, b) in sheet.parts.iter().tuple_combinations() {
                let (ba, bb) = (a.placed_bbox().unwrap(), b.placed_bbox().unwrap());
                assert!(!ba.overlaps(&bb), "{} overlaps {}", a.id, b.id);
            }
        }
        Ok(())
    }
}
