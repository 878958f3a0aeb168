use std::cmp::Reverse;

use itertools::Itertools;
use log::debug;
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use foamcut::entities::{Part, Sheet, SheetType};
use foamcut::geometry::Transformation;
use foamcut::geometry::geo_traits::Transformable;
use foamcut::geometry::primitives::{Rect, SPolygon};
use foamcut::util::{FPA, GEOM_TOLERANCE};

use crate::config::{CollisionMode, LBFConfig};
use crate::opt::loss::LBFLoss;

/// A valid position for a part on a sheet
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LBFPlacement {
    /// Rotation in degrees
    pub rotation: f64,
    /// Translation applied after the rotation
    pub translation: (f64, f64),
    pub loss: LBFLoss,
}

/// Everything already on a sheet that a new part has to stay clear of
struct Occupied {
    bboxes: Vec<Rect>,
    outlines: Vec<SPolygon>,
}

impl Occupied {
    fn from_sheet(sheet: &Sheet, mode: CollisionMode) -> Self {
        let outlines = match mode {
            CollisionMode::BoundingBox => vec![],
            CollisionMode::Polygon => sheet.parts.iter().filter_map(|p| p.placed_outline()).collect(),
        };
        let bboxes = sheet.parts.iter().filter_map(|p| p.placed_bbox()).collect();
        Occupied { bboxes, outlines }
    }
}

/// Searches the sheet for a valid placement of the part, with minimal loss.
///
/// Candidate positions put the bounding box's lower-left corner at `x ∈ {0} ∪ {placed x_max + spacing}`
/// and `y ∈ {0} ∪ {placed y_max + spacing}`. Every allowed rotation is evaluated in parallel.
/// Ties are broken by the rotation's position in the config, then by candidate order (lowest y, then lowest x).
/// Returns the best placement and the number of candidates evaluated.
pub fn search(sheet: &Sheet, part: &Part, config: &LBFConfig) -> (Option<LBFPlacement>, usize) {
    let Some(outline) = part.outline() else {
        return (None, 0);
    };
    let occupied = Occupied::from_sheet(sheet, config.collision_mode);
    let sheet_rect = sheet.sheet_type().rect();

    let xs = candidate_coords(occupied.bboxes.iter().map(|bb| bb.x_max + config.spacing));
    let ys = candidate_coords(occupied.bboxes.iter().map(|bb| bb.y_max + config.spacing));

    let per_rotation = config
        .rotations
        .par_iter()
        .enumerate()
        .map(|(r_idx, &rotation)| {
            let rotated = outline.transform_clone(&Transformation::from_rotation(rotation.to_radians()));
            let bb = rotated.bbox;
            let (w, h) = (bb.width(), bb.height());

            let mut n_evaluated = 0;
            let mut best: Option<LBFPlacement> = None;
            for (&y, &x) in ys.iter().cartesian_product(xs.iter()) {
                n_evaluated += 1;
                let cand_bbox = Rect::new(x, y, x + w, y + h);
                if !sheet_rect.contains_rect(&cand_bbox) {
                    continue;
                }
                let loss = LBFLoss::from_bbox(&cand_bbox);
                if best.is_some_and(|b| loss >= b.loss) {
                    //only validate candidates that improve on the current best
                    continue;
                }
                let translation = (x - bb.x_min, y - bb.y_min);
                if !collides(&occupied, &rotated, translation, &cand_bbox, config) {
                    best = Some(LBFPlacement {
                        rotation,
                        translation,
                        loss,
                    });
                }
            }
            (best.map(|b| (b, r_idx)), n_evaluated)
        })
        .collect::<Vec<_>>();

    let n_evaluated = per_rotation.iter().map(|(_, n)| n).sum();
    let best = per_rotation
        .into_iter()
        .filter_map(|(b, _)| b)
        .min_by_key(|(b, r_idx)| (b.loss, *r_idx))
        .map(|(b, _)| b);

    if let Some(b) = &best {
        debug!(
            "[SEARCH] {}: r: {:.1}°, t: ({:.3}, {:.3}), loss: {:.3}",
            part.id,
            b.rotation,
            b.translation.0,
            b.translation.1,
            b.loss.value()
        );
    }

    (best, n_evaluated)
}

fn candidate_coords(coords: impl Iterator<Item = f64>) -> Vec<f64> {
    std::iter::once(0.0)
        .chain(coords)
        .sorted_by_key(|c| OrderedFloat(*c))
        .dedup_by(|a, b| FPA(*a) == FPA(*b))
        .collect()
}

fn collides(
    occupied: &Occupied,
    rotated: &SPolygon,
    translation: (f64, f64),
    cand_bbox: &Rect,
    config: &LBFConfig,
) -> bool {
    let bbox_hits = occupied
        .bboxes
        .iter()
        .map(|bb| bb.inflate(config.spacing))
        .filter(|bb| bb.overlaps(cand_bbox));

    match config.collision_mode {
        CollisionMode::BoundingBox => bbox_hits.count() > 0,
        CollisionMode::Polygon => {
            if bbox_hits.count() == 0 {
                return false;
            }
            let placed = rotated.transform_clone(&Transformation::from_translation(translation));
            occupied.outlines.iter().any(|other| {
                placed.overlaps(other)
                    || (config.spacing > 0.0
                        && FPA(min_distance(&placed, other)) < FPA(config.spacing))
            })
        }
    }
}

/// Minimum distance between the boundaries of two polygons
fn min_distance(a: &SPolygon, b: &SPolygon) -> f64 {
    let one_way = |p: &SPolygon, q: &SPolygon| {
        p.points
            .iter()
            .flat_map(|pt| q.edge_iter().map(move |e| e.sq_distance_to(pt)))
            .fold(f64::MAX, f64::min)
    };
    f64::min(one_way(a, b), one_way(b, a)).sqrt()
}

/// Parts sorted by descending bounding box area, equal areas keep their input order
pub fn item_placement_order(parts: &[Part]) -> Vec<usize> {
    (0..parts.len())
        .sorted_by_cached_key(|&i| {
            let area = parts[i].outline().map_or(0.0, |o| o.bbox.area());
            Reverse(OrderedFloat(area))
        })
        .collect()
}

/// True if the part fits on an empty sheet of type `sheet_type` under at least one of the allowed rotations
pub fn fits_sheet_type(part: &Part, sheet_type: &SheetType, config: &LBFConfig) -> bool {
    let Some(outline) = part.outline() else {
        return false;
    };
    config.rotations.iter().any(|r| {
        let bb = outline
            .transform_clone(&Transformation::from_rotation(r.to_radians()))
            .bbox;
        bb.width() <= sheet_type.width + GEOM_TOLERANCE
            && bb.height() <= sheet_type.height + GEOM_TOLERANCE
    })
}
