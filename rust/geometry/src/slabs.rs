// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slab and roof extraction.
//!
//! Per storey: one merged polygon per connected footprint component, with
//! collinear vertices simplified. The slab sits at the storey elevation;
//! the roof mirrors the same ring at elevation + ceiling height.

use graphbim_core::{Config, LayoutRect, Point2D, Roof, SlabPolygon, Storey};

use crate::geom2d::union_footprint;

/// Extract the slabs and roofs for one storey. A storey with no
/// rectangles produces nothing; a multi-component footprint produces one
/// slab and one roof per component.
pub fn extract_slabs(
    storey: &Storey,
    rects: &[LayoutRect],
    ceiling_height: f64,
    config: &Config,
) -> (Vec<SlabPolygon>, Vec<Roof>) {
    let mut on_storey: Vec<&LayoutRect> =
        rects.iter().filter(|r| r.storey_id == storey.id).collect();
    on_storey.sort_by(|a, b| a.space_id.cmp(&b.space_id));
    if on_storey.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut slabs = Vec::new();
    let mut roofs = Vec::new();
    for ring in union_footprint(&on_storey) {
        let ring: Vec<Point2D> = ring.iter().map(|p| Point2D::new(p.x, p.y)).collect();
        if ring.len() < 3 {
            continue;
        }
        slabs.push(SlabPolygon {
            storey_id: storey.id.clone(),
            ring: ring.clone(),
            thickness: config.slab_thickness,
            elevation: storey.elevation,
        });
        roofs.push(Roof {
            storey_id: storey.id.clone(),
            ring,
            elevation: storey.elevation + ceiling_height,
        });
    }

    tracing::debug!(
        storey = %storey.id,
        slabs = slabs.len(),
        "slab extraction complete"
    );
    (slabs, roofs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storey(id: &str, elevation: f64) -> Storey {
        Storey {
            id: id.into(),
            name: None,
            elevation,
            index: 0,
        }
    }

    fn rect(id: &str, storey: &str, x: f64, y: f64, w: f64, h: f64) -> LayoutRect {
        LayoutRect::new(id, storey, x, y, w, h)
    }

    #[test]
    fn one_space_one_slab_one_roof() {
        let st = storey("L1", 0.0);
        let rects = vec![rect("r1", "L1", 0.0, 0.0, 4.0, 4.0)];
        let (slabs, roofs) = extract_slabs(&st, &rects, 2.8, &Config::default());
        assert_eq!(slabs.len(), 1);
        assert_eq!(roofs.len(), 1);
        assert!((slabs[0].area() - 16.0).abs() < 1e-6);
        assert_eq!(slabs[0].elevation, 0.0);
        assert!((roofs[0].elevation - 2.8).abs() < 1e-9);
        assert_eq!(slabs[0].ring, roofs[0].ring);
    }

    #[test]
    fn merged_slab_covers_the_union() {
        let st = storey("L1", 0.0);
        let rects = vec![
            rect("a", "L1", 0.0, 0.0, 4.0, 4.0),
            rect("b", "L1", 4.0, 0.0, 4.0, 4.0),
        ];
        let (slabs, _) = extract_slabs(&st, &rects, 2.8, &Config::default());
        assert_eq!(slabs.len(), 1);
        assert!((slabs[0].area() - 32.0).abs() < 1e-6);
    }

    #[test]
    fn disconnected_components_yield_one_slab_each() {
        let st = storey("L1", 0.0);
        let rects = vec![
            rect("a", "L1", 0.0, 0.0, 4.0, 4.0),
            rect("b", "L1", 4.0, 0.0, 4.0, 4.0),
            rect("x", "L1", 20.0, 0.0, 3.0, 3.0),
            rect("y", "L1", 23.0, 0.0, 3.0, 3.0),
        ];
        let (slabs, roofs) = extract_slabs(&st, &rects, 2.8, &Config::default());
        assert_eq!(slabs.len(), 2);
        assert_eq!(roofs.len(), 2);
    }

    #[test]
    fn storey_elevation_carries_into_slab_and_roof() {
        let st = storey("L2", 3.0);
        let rects = vec![rect("c", "L2", 0.0, 0.0, 4.0, 4.0)];
        let (slabs, roofs) = extract_slabs(&st, &rects, 2.8, &Config::default());
        assert_eq!(slabs[0].elevation, 3.0);
        assert!((roofs[0].elevation - 5.8).abs() < 1e-9);
    }

    #[test]
    fn empty_storey_produces_nothing() {
        let st = storey("L1", 0.0);
        let (slabs, roofs) = extract_slabs(&st, &[], 2.8, &Config::default());
        assert!(slabs.is_empty());
        assert!(roofs.is_empty());
    }
}
