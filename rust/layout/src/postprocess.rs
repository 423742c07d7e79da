// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout post-processing: grid snapping, the optional single-storey
//! filter, and per-storey re-origin for downstream consumers.

use rustc_hash::FxHashMap;
use serde::Serialize;

use graphbim_core::{Config, LayoutRect, Storey, COORD_EPS};

/// Per-storey bounding box after re-origin. `origin_*` is the translation
/// that was removed from the rectangles, so consumers that need global
/// coordinates can add it back exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreyExtent {
    pub storey_id: String,
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Snap all rectangles to the grid: floor for the lower-left corner, ceil
/// for the right/top edge (outward rounding), then resolve any conflict
/// the rounding introduced by pulling the lexicographically-later
/// rectangle in by whole grid units.
pub fn snap_to_grid(rects: &[LayoutRect], grid: f64) -> Vec<LayoutRect> {
    let mut out: Vec<LayoutRect> = rects
        .iter()
        .map(|r| {
            let x = snap_floor(r.x, grid);
            let y = snap_floor(r.y, grid);
            let x2 = snap_ceil(r.x2(), grid).max(x + grid);
            let y2 = snap_ceil(r.y2(), grid).max(y + grid);
            LayoutRect::new(r.space_id.clone(), r.storey_id.clone(), x, y, x2 - x, y2 - y)
        })
        .collect();

    // Outward rounding can push an edge at most one grid unit into a
    // neighbour; shrink the later rectangle on the axis of least
    // penetration until the pair is clean again.
    let mut order: Vec<usize> = (0..out.len()).collect();
    order.sort_by(|&a, &b| {
        (out[a].storey_id.as_str(), out[a].space_id.as_str())
            .cmp(&(out[b].storey_id.as_str(), out[b].space_id.as_str()))
    });

    for oi in 0..order.len() {
        for oj in (oi + 1)..order.len() {
            let (i, j) = (order[oi], order[oj]);
            if out[i].storey_id != out[j].storey_id {
                continue;
            }
            // Snapping moves each edge at most one grid unit, so a few
            // pulls always separate the pair; the bound is just a guard
            // against malformed solver output.
            for _ in 0..64 {
                let iw = out[i].x2().min(out[j].x2()) - out[i].x.max(out[j].x);
                let ih = out[i].y2().min(out[j].y2()) - out[i].y.max(out[j].y);
                if iw <= COORD_EPS || ih <= COORD_EPS {
                    break;
                }
                let keep = out[i].clone();
                let later = &mut out[j];
                if iw <= ih {
                    if later.x + later.width / 2.0 >= keep.x + keep.width / 2.0 {
                        later.x += grid;
                    }
                    later.width = (later.width - grid).max(grid);
                } else {
                    if later.y + later.height / 2.0 >= keep.y + keep.height / 2.0 {
                        later.y += grid;
                    }
                    later.height = (later.height - grid).max(grid);
                }
            }
        }
    }
    out
}

fn snap_floor(v: f64, grid: f64) -> f64 {
    ((v / grid) + COORD_EPS).floor() * grid
}

fn snap_ceil(v: f64, grid: f64) -> f64 {
    ((v / grid) - COORD_EPS).ceil() * grid
}

/// Single-storey mode: keep only the rectangles on the lowest storey,
/// normalize that storey's elevation to 0 and preserve its identifier and
/// name. Returns the retained rectangles and storeys.
pub fn filter_single_storey(
    rects: Vec<LayoutRect>,
    storeys: &[Storey],
) -> (Vec<LayoutRect>, Vec<Storey>) {
    let referenced: Vec<&Storey> = storeys
        .iter()
        .filter(|st| rects.iter().any(|r| r.storey_id == st.id))
        .collect();
    let Some(base) = referenced
        .iter()
        .map(|st| st.elevation)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    else {
        return (rects, storeys.to_vec());
    };

    let kept_storeys: Vec<Storey> = referenced
        .iter()
        .filter(|st| (st.elevation - base).abs() <= COORD_EPS)
        .map(|st| Storey {
            id: st.id.clone(),
            name: st.name.clone(),
            elevation: 0.0,
            index: 0,
        })
        .collect();

    let kept_rects: Vec<LayoutRect> = rects
        .into_iter()
        .filter(|r| kept_storeys.iter().any(|st| st.id == r.storey_id))
        .collect();

    tracing::debug!(
        kept_storeys = kept_storeys.len(),
        kept_rects = kept_rects.len(),
        "single-storey filter applied"
    );
    (kept_rects, kept_storeys)
}

/// Translate every storey's rectangles so the storey bounding box starts
/// at (0, 0); returns the per-storey extents, sorted by storey id.
pub fn reorigin_storeys(rects: &mut [LayoutRect]) -> Vec<StoreyExtent> {
    let mut bounds: FxHashMap<String, (f64, f64, f64, f64)> = FxHashMap::default();
    for r in rects.iter() {
        let e = bounds
            .entry(r.storey_id.clone())
            .or_insert((f64::MAX, f64::MAX, f64::MIN, f64::MIN));
        e.0 = e.0.min(r.x);
        e.1 = e.1.min(r.y);
        e.2 = e.2.max(r.x2());
        e.3 = e.3.max(r.y2());
    }
    for r in rects.iter_mut() {
        let (min_x, min_y, _, _) = bounds[&r.storey_id];
        r.x -= min_x;
        r.y -= min_y;
    }

    let mut extents: Vec<StoreyExtent> = bounds
        .into_iter()
        .map(|(storey_id, (min_x, min_y, max_x, max_y))| StoreyExtent {
            storey_id,
            origin_x: min_x,
            origin_y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
        .collect();
    extents.sort_by(|a, b| a.storey_id.cmp(&b.storey_id));
    extents
}

/// The full post-processing pass in pipeline order.
pub fn postprocess(
    rects: Vec<LayoutRect>,
    storeys: &[Storey],
    config: &Config,
) -> (Vec<LayoutRect>, Vec<Storey>, Vec<StoreyExtent>) {
    let snapped = snap_to_grid(&rects, config.grid_unit);
    let (mut rects, storeys) = if config.single_storey_mode {
        filter_single_storey(snapped, storeys)
    } else {
        (snapped, storeys.to_vec())
    };
    let extents = reorigin_storeys(&mut rects);
    (rects, storeys, extents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str, storey: &str, x: f64, y: f64, w: f64, h: f64) -> LayoutRect {
        LayoutRect::new(id, storey, x, y, w, h)
    }

    fn storey(id: &str, elevation: f64) -> Storey {
        Storey {
            id: id.into(),
            name: Some(format!("Level {id}")),
            elevation,
            index: 0,
        }
    }

    #[test]
    fn snapping_rounds_outward() {
        let rects = vec![rect("a", "L1", 0.013, 0.049, 3.98, 2.52)];
        let out = snap_to_grid(&rects, 0.05);
        assert!((out[0].x - 0.0).abs() < 1e-9);
        assert!((out[0].y - 0.0).abs() < 1e-9);
        assert!((out[0].x2() - 4.0).abs() < 1e-9);
        assert!((out[0].y2() - 2.6).abs() < 1e-9);
    }

    #[test]
    fn snapping_resolves_introduced_overlap() {
        // Rounding outward makes these two collide by one grid unit.
        let rects = vec![
            rect("a", "L1", 0.0, 0.0, 3.98, 4.0),
            rect("b", "L1", 3.99, 0.0, 4.0, 4.0),
        ];
        let out = snap_to_grid(&rects, 0.05);
        assert!(out[0].intersection_area(&out[1]) <= COORD_EPS);
    }

    #[test]
    fn exact_grid_values_are_untouched() {
        let rects = vec![rect("a", "L1", 1.0, 2.0, 4.0, 4.0)];
        let out = snap_to_grid(&rects, 0.05);
        assert_eq!(out[0], rects[0]);
    }

    #[test]
    fn single_storey_keeps_lowest_and_normalizes() {
        let rects = vec![
            rect("a", "L1", 0.0, 0.0, 4.0, 4.0),
            rect("b", "L2", 0.0, 0.0, 4.0, 4.0),
        ];
        let storeys = vec![storey("L1", 0.0), storey("L2", 3.0)];
        let (kept, kept_storeys) = filter_single_storey(rects, &storeys);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].storey_id, "L1");
        assert_eq!(kept_storeys.len(), 1);
        assert_eq!(kept_storeys[0].id, "L1");
        assert_eq!(kept_storeys[0].name.as_deref(), Some("Level L1"));
        assert_eq!(kept_storeys[0].elevation, 0.0);
    }

    #[test]
    fn reorigin_translates_per_storey() {
        let mut rects = vec![
            rect("a", "L1", 10.0, 5.0, 4.0, 4.0),
            rect("b", "L1", 14.0, 5.0, 4.0, 4.0),
            rect("c", "L2", -2.0, 1.0, 3.0, 3.0),
        ];
        let extents = reorigin_storeys(&mut rects);
        assert_eq!(rects[0].x, 0.0);
        assert_eq!(rects[1].x, 4.0);
        assert_eq!(rects[2].x, 0.0);
        assert_eq!(extents.len(), 2);
        assert_eq!(extents[0].storey_id, "L1");
        assert!((extents[0].width - 8.0).abs() < 1e-9);
        assert!((extents[0].origin_x - 10.0).abs() < 1e-9);
    }
}
