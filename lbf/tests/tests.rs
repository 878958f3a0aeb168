#[cfg(test)]
mod tests {
    use std::path::Path;

    use anyhow::Result;
    use float_cmp::approx_eq;
    use itertools::Itertools;
    use test_case::test_case;

    use foamcut::entities::{
        NestingResult, Part, PartSource, SheetType, UnplaceableReason, validate_placement_bounds,
    };
    use foamcut::geometry::primitives::{Rect, SPolygon};
    use foamcut::io::import::import_instance;
    use lbf::config::{CollisionMode, LBFConfig};
    use lbf::io;
    use lbf::opt::lbf_nest::LBFOptimizer;

    fn init_logger() {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Debug)
            .try_init();
    }

    fn rect_parts(sku: &str, n: usize, w: f64, h: f64) -> Vec<Part> {
        let outline = SPolygon::from(Rect::try_new(0.0, 0.0, w, h).unwrap());
        (0..n)
            .map(|i| {
                let source = PartSource {
                    order_id: "ORD-1".to_string(),
                    sku: sku.to_string(),
                    ..PartSource::default()
                };
                Part::new(format!("{sku}_{}", i + 1), vec![outline.clone()], source)
            })
            .collect()
    }

    /// No overlaps (by bounding box or outline, depending on the mode) and every part inside its sheet
    fn assert_feasible(result: &NestingResult, mode: CollisionMode) {
        for sheet in result.placements.iter() {
            let bounds = Rect::new(0.0, 0.0, sheet.width, sheet.height);
            assert!(validate_placement_bounds(&sheet.parts, bounds));
            for (a, b) in sheet.parts.iter().tuple_combinations() {
                let overlap = match mode {
                    CollisionMode::BoundingBox => a
                        .placed_bbox()
                        .unwrap()
                        .overlaps(&b.placed_bbox().unwrap()),
                    CollisionMode::Polygon => a
                        .placed_outline()
                        .unwrap()
                        .overlaps(&b.placed_outline().unwrap()),
                };
                assert!(!overlap, "{} overlaps {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn twenty_rectangles_fit_on_one_sheet() {
        init_logger();
        let parts = rect_parts("RECT", 20, 100.0, 50.0);
        let result = LBFOptimizer::new(
            parts,
            vec![SheetType::new(1000.0, 500.0)],
            LBFConfig::default(),
        )
        .solve();

        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.n_placed(), 20);
        assert!(result.unplaceable.is_empty());
        assert!(approx_eq!(f64, result.placements[0].utilization(), 0.2, epsilon = 1e-9));
        assert_feasible(&result, CollisionMode::BoundingBox);
    }

    #[test]
    fn overflow_opens_new_sheets() {
        init_logger();
        let config = LBFConfig {
            rotations: vec![0.0],
            ..LBFConfig::default()
        };
        //4 parts per sheet
        let parts = rect_parts("HALF", 9, 50.0, 50.0);
        let result = LBFOptimizer::new(parts, vec![SheetType::new(100.0, 100.0)], config).solve();

        assert_eq!(result.placements.len(), 3);
        assert_eq!(
            result.placements.iter().map(|s| s.parts.len()).collect_vec(),
            vec![4, 4, 1]
        );
        assert_eq!(
            result.placements.iter().map(|s| s.sheet_index).collect_vec(),
            vec![0, 1, 2]
        );
        assert_feasible(&result, CollisionMode::BoundingBox);
    }

    #[test]
    fn oversized_part_is_reported_not_fatal() {
        init_logger();
        let mut parts = rect_parts("SMALL", 3, 100.0, 100.0);
        parts.extend(rect_parts("HUGE", 1, 1200.0, 1200.0));
        let result =
            LBFOptimizer::new(parts, vec![SheetType::new(1000.0, 500.0)], LBFConfig::default())
                .solve();

        assert_eq!(result.n_placed(), 3);
        assert_eq!(result.unplaceable.len(), 1);
        assert_eq!(result.unplaceable[0].part_id, "HUGE_1");
        assert_eq!(result.unplaceable[0].reason, UnplaceableReason::ExceedsSheet);
    }

    #[test]
    fn rotation_makes_long_part_fit() {
        let parts = rect_parts("LONG", 1, 400.0, 900.0);
        let result =
            LBFOptimizer::new(parts, vec![SheetType::new(1000.0, 500.0)], LBFConfig::default())
                .solve();

        assert_eq!(result.n_placed(), 1);
        let part = &result.placements[0].parts[0];
        assert!(approx_eq!(f64, part.rotation.rem_euclid(180.0), 90.0));
        assert_feasible(&result, CollisionMode::BoundingBox);
    }

    #[test]
    fn sheet_limit_is_respected() {
        let config = LBFConfig {
            rotations: vec![0.0],
            max_sheets: Some(1),
            ..LBFConfig::default()
        };
        let parts = rect_parts("HALF", 6, 50.0, 50.0);
        let result = LBFOptimizer::new(parts, vec![SheetType::new(100.0, 100.0)], config).solve();

        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.n_placed(), 4);
        assert_eq!(result.unplaceable.len(), 2);
        assert!(
            result
                .unplaceable
                .iter()
                .all(|u| u.reason == UnplaceableReason::SheetLimitReached)
        );
    }

    #[test]
    fn spacing_keeps_parts_apart() {
        let config = LBFConfig {
            rotations: vec![0.0],
            spacing: 10.0,
            ..LBFConfig::default()
        };
        let parts = rect_parts("SPACED", 4, 100.0, 100.0);
        let result = LBFOptimizer::new(parts, vec![SheetType::new(1000.0, 1000.0)], config).solve();

        let sheet = &result.placements[0];
        for (a, b) in sheet.parts.iter().tuple_combinations() {
            let (ba, bb) = (a.placed_bbox().unwrap(), b.placed_bbox().unwrap());
            assert!(!ba.inflate(10.0 - 1e-6).overlaps(&bb));
        }
    }

    #[test_case("../assets/foam_inserts.json", CollisionMode::BoundingBox; "foam_inserts bbox")]
    #[test_case("../assets/foam_inserts.json", CollisionMode::Polygon; "foam_inserts polygon")]
    fn test_instance(instance_path: &str, collision_mode: CollisionMode) -> Result<()> {
        init_logger();
        let ext_instance = io::read_instance(Path::new(instance_path))?;
        let (parts, sheet_types) = import_instance(&ext_instance)?;
        let n_requested = parts.len();
        let config = LBFConfig {
            collision_mode,
            ..LBFConfig::default()
        };

        let result = LBFOptimizer::new(parts.clone(), sheet_types.clone(), config.clone()).solve();

        //completeness: every part is either placed exactly once or reported
        let placed_ids = result
            .placements
            .iter()
            .flat_map(|s| s.parts.iter().map(|p| p.id.clone()))
            .collect_vec();
        assert_eq!(placed_ids.len() + result.unplaceable.len(), n_requested);
        assert_eq!(placed_ids.iter().unique().count(), placed_ids.len());
        assert_feasible(&result, collision_mode);

        //determinism
        let again = LBFOptimizer::new(parts, sheet_types, config).solve();
        assert_eq!(again.placements.len(), result.placements.len());
        for (s1, s2) in result.placements.iter().zip(again.placements.iter()) {
            for (p1, p2) in s1.parts.iter().zip(s2.parts.iter()) {
                assert_eq!(p1.id, p2.id);
                assert_eq!((p1.rotation, p1.x, p1.y), (p2.rotation, p2.x, p2.y));
            }
        }
        Ok(())
    }
}
