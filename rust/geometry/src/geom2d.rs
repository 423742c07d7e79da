// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2-D geometry helpers for the extractors.
//!
//! Polygon unions go through the i_overlay crate; everything else is
//! axis-aligned interval arithmetic with the pipeline-wide epsilons
//! ([`COORD_EPS`] for coordinates, [`MIN_SEGMENT_LEN`] for lengths).

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

use graphbim_core::{LayoutRect, Point2D, COORD_EPS, MIN_SEGMENT_LEN};

/// Axis a boundary segment runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
}

/// An axis-aligned boundary segment: the `at` coordinate is constant, the
/// segment spans `[lo, hi]` along [`Axis`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySegment {
    pub axis: Axis,
    pub at: f64,
    pub lo: f64,
    pub hi: f64,
}

impl BoundarySegment {
    pub fn length(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn midpoint(&self) -> Point2D {
        let mid = (self.lo + self.hi) / 2.0;
        match self.axis {
            Axis::X => Point2D::new(mid, self.at),
            Axis::Y => Point2D::new(self.at, mid),
        }
    }

    pub fn start(&self) -> Point2D {
        match self.axis {
            Axis::X => Point2D::new(self.lo, self.at),
            Axis::Y => Point2D::new(self.at, self.lo),
        }
    }

    pub fn end(&self) -> Point2D {
        match self.axis {
            Axis::X => Point2D::new(self.hi, self.at),
            Axis::Y => Point2D::new(self.at, self.hi),
        }
    }
}

/// The boundary segment two rectangles share, or `None` when they do not
/// abut (corner touches count as no boundary).
pub fn shared_boundary(a: &LayoutRect, b: &LayoutRect) -> Option<BoundarySegment> {
    // Vertical boundary: right edge of one meets left edge of the other.
    for (left, right) in [(a, b), (b, a)] {
        if (left.x2() - right.x).abs() <= COORD_EPS {
            let lo = a.y.max(b.y);
            let hi = a.y2().min(b.y2());
            if hi - lo > COORD_EPS {
                return Some(BoundarySegment {
                    axis: Axis::Y,
                    at: left.x2(),
                    lo,
                    hi,
                });
            }
        }
    }
    // Horizontal boundary: top edge of one meets bottom edge of the other.
    for (below, above) in [(a, b), (b, a)] {
        if (below.y2() - above.y).abs() <= COORD_EPS {
            let lo = a.x.max(b.x);
            let hi = a.x2().min(b.x2());
            if hi - lo > COORD_EPS {
                return Some(BoundarySegment {
                    axis: Axis::X,
                    at: below.y2(),
                    lo,
                    hi,
                });
            }
        }
    }
    None
}

/// Union of rectangle footprints. Returns the outer ring of every
/// connected component, counter-clockwise, collinear vertices removed.
/// Interior holes (fully enclosed courtyards) are dropped.
pub fn union_footprint(rects: &[&LayoutRect]) -> Vec<Vec<Point2<f64>>> {
    if rects.is_empty() {
        return Vec::new();
    }
    let paths: Vec<Vec<[f64; 2]>> = rects.iter().map(|r| rect_path(r)).collect();

    let mut rings: Vec<Vec<Point2<f64>>> = if paths.len() == 1 {
        vec![path_to_points(&paths[0])]
    } else {
        let subject = vec![paths[0].clone()];
        let clip: Vec<Vec<[f64; 2]>> = paths[1..].to_vec();
        let shapes = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);
        shapes
            .iter()
            .filter_map(|shape| shape.first())
            .map(|contour| path_to_points(contour))
            .collect()
    };

    for ring in &mut rings {
        ensure_ccw(ring);
        *ring = simplify_ring(ring);
    }
    rings.retain(|r| r.len() >= 3);
    // Components ordered by their lowest-left vertex for stable output.
    rings.sort_by(|a, b| {
        let ka = ring_min_corner(a);
        let kb = ring_min_corner(b);
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
    });
    rings
}

fn rect_path(r: &LayoutRect) -> Vec<[f64; 2]> {
    vec![
        [r.x, r.y],
        [r.x2(), r.y],
        [r.x2(), r.y2()],
        [r.x, r.y2()],
    ]
}

fn path_to_points(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

fn ring_min_corner(ring: &[Point2<f64>]) -> (f64, f64) {
    let min_x = ring.iter().map(|p| p.x).fold(f64::MAX, f64::min);
    let min_y = ring.iter().map(|p| p.y).fold(f64::MAX, f64::min);
    (min_x, min_y)
}

/// Signed shoelace area: positive for counter-clockwise rings.
pub fn signed_area(ring: &[Point2<f64>]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].x * ring[j].y - ring[j].x * ring[i].y;
    }
    area / 2.0
}

fn ensure_ccw(ring: &mut Vec<Point2<f64>>) {
    if signed_area(ring) < 0.0 {
        ring.reverse();
    }
}

/// Remove coincident and collinear vertices.
pub fn simplify_ring(ring: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut pts: Vec<Point2<f64>> = Vec::with_capacity(ring.len());
    for &p in ring {
        if let Some(last) = pts.last() {
            if (last.x - p.x).abs() <= COORD_EPS && (last.y - p.y).abs() <= COORD_EPS {
                continue;
            }
        }
        pts.push(p);
    }
    if pts.len() >= 2 {
        let (first, last) = (pts[0], *pts.last().unwrap());
        if (first.x - last.x).abs() <= COORD_EPS && (first.y - last.y).abs() <= COORD_EPS {
            pts.pop();
        }
    }
    if pts.len() < 3 {
        return pts;
    }

    let mut out: Vec<Point2<f64>> = Vec::with_capacity(pts.len());
    let n = pts.len();
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        // Distance of `cur` from the line prev→next, not the raw cross
        // product: long edges must not mask real corners.
        let cross = (cur.x - prev.x) * (next.y - cur.y) - (cur.y - prev.y) * (next.x - cur.x);
        let base = ((next.x - prev.x).powi(2) + (next.y - prev.y).powi(2)).sqrt();
        let dist = if base > COORD_EPS {
            cross.abs() / base
        } else {
            cross.abs()
        };
        if dist > COORD_EPS {
            out.push(cur);
        }
    }
    out
}

/// Decompose a ring into maximal axis-aligned boundary segments, merging
/// any segment shorter than [`MIN_SEGMENT_LEN`] with its collinear
/// neighbours. Segments that cannot be merged are dropped; the second
/// return value counts the drops.
pub fn ring_segments_cleaned(ring: &[Point2<f64>]) -> (Vec<BoundarySegment>, usize) {
    let n = ring.len();
    let mut segs: Vec<BoundarySegment> = (0..n)
        .filter_map(|i| edge_to_segment(ring[i], ring[(i + 1) % n]))
        .collect();
    let mut dropped = 0;

    loop {
        let Some(k) = segs.iter().position(|s| s.length() < MIN_SEGMENT_LEN) else {
            break;
        };
        let n = segs.len();
        if n <= 2 {
            segs.remove(k);
            dropped += 1;
            continue;
        }
        let prev = (k + n - 1) % n;
        let next = (k + 1) % n;
        let mergeable = prev != next
            && segs[prev].axis == segs[next].axis
            && (segs[prev].at - segs[next].at).abs() <= MIN_SEGMENT_LEN;
        if mergeable {
            // Keep the longer neighbour's offset.
            let at = if segs[prev].length() >= segs[next].length() {
                segs[prev].at
            } else {
                segs[next].at
            };
            segs[prev] = BoundarySegment {
                axis: segs[prev].axis,
                at,
                lo: segs[prev].lo.min(segs[next].lo),
                hi: segs[prev].hi.max(segs[next].hi),
            };
            let mut remove = [k, next];
            remove.sort_unstable();
            segs.remove(remove[1]);
            segs.remove(remove[0]);
        } else {
            segs.remove(k);
            dropped += 1;
        }
    }
    (segs, dropped)
}

/// Classify an edge as an axis-aligned boundary segment. `None` for
/// diagonal edges (which cannot arise from rectangle unions).
pub fn edge_to_segment(start: Point2<f64>, end: Point2<f64>) -> Option<BoundarySegment> {
    if (start.y - end.y).abs() <= COORD_EPS {
        let (lo, hi) = (start.x.min(end.x), start.x.max(end.x));
        Some(BoundarySegment {
            axis: Axis::X,
            at: (start.y + end.y) / 2.0,
            lo,
            hi,
        })
    } else if (start.x - end.x).abs() <= COORD_EPS {
        let (lo, hi) = (start.y.min(end.y), start.y.max(end.y));
        Some(BoundarySegment {
            axis: Axis::Y,
            at: (start.x + end.x) / 2.0,
            lo,
            hi,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> LayoutRect {
        LayoutRect::new(id, "L1", x, y, w, h)
    }

    #[test]
    fn shared_boundary_vertical() {
        let a = rect("a", 0.0, 0.0, 4.0, 4.0);
        let b = rect("b", 4.0, 1.0, 4.0, 4.0);
        let s = shared_boundary(&a, &b).unwrap();
        assert_eq!(s.axis, Axis::Y);
        assert!((s.at - 4.0).abs() < 1e-9);
        assert!((s.length() - 3.0).abs() < 1e-9);
        let mid = s.midpoint();
        assert!((mid.x - 4.0).abs() < 1e-9);
        assert!((mid.y - 2.5).abs() < 1e-9);
    }

    #[test]
    fn corner_touch_is_no_boundary() {
        let a = rect("a", 0.0, 0.0, 4.0, 4.0);
        let b = rect("b", 4.0, 4.0, 4.0, 4.0);
        assert!(shared_boundary(&a, &b).is_none());
    }

    #[test]
    fn separated_rects_share_nothing() {
        let a = rect("a", 0.0, 0.0, 4.0, 4.0);
        let b = rect("b", 10.0, 0.0, 4.0, 4.0);
        assert!(shared_boundary(&a, &b).is_none());
    }

    #[test]
    fn union_of_two_abutting_rects_is_one_ring() {
        let a = rect("a", 0.0, 0.0, 4.0, 4.0);
        let b = rect("b", 4.0, 0.0, 4.0, 4.0);
        let rings = union_footprint(&[&a, &b]);
        assert_eq!(rings.len(), 1);
        // 8×4 rectangle after collinear simplification.
        assert_eq!(rings[0].len(), 4);
        assert!((signed_area(&rings[0]) - 32.0).abs() < 1e-6);
    }

    #[test]
    fn union_of_disjoint_rects_has_two_components() {
        let a = rect("a", 0.0, 0.0, 4.0, 4.0);
        let b = rect("b", 10.0, 0.0, 4.0, 4.0);
        let rings = union_footprint(&[&a, &b]);
        assert_eq!(rings.len(), 2);
        // Ordered by lowest-left corner.
        assert!(ring_min_corner(&rings[0]) < ring_min_corner(&rings[1]));
    }

    #[test]
    fn l_shaped_union_keeps_six_corners() {
        let a = rect("a", 0.0, 0.0, 4.0, 4.0);
        let b = rect("b", 4.0, 0.0, 4.0, 2.0);
        let rings = union_footprint(&[&a, &b]);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 6);
    }

    #[test]
    fn simplify_removes_collinear_vertices() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        let out = simplify_ring(&ring);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn short_staircase_edge_merges_into_neighbours() {
        // A 4×4 square with a 0.02 m notch on the right edge.
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(4.02, 2.0),
            Point2::new(4.02, 4.0),
            Point2::new(0.0, 4.0),
        ];
        let (segs, dropped) = ring_segments_cleaned(&ring);
        assert_eq!(segs.len(), 4);
        assert_eq!(dropped, 0);
        // The two vertical runs merged into one full-height segment.
        let right = segs
            .iter()
            .find(|s| s.axis == Axis::Y && s.at > 3.0)
            .unwrap();
        assert!((right.length() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn unmergeable_short_edge_is_dropped() {
        // Degenerate sliver: a 0.02 m wide spike.
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 0.02),
            Point2::new(0.0, 0.02),
        ];
        let (segs, dropped) = ring_segments_cleaned(&ring);
        assert!(dropped >= 1 || segs.len() < 4);
    }
}
