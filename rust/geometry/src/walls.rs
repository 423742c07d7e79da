// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall segment extraction.
//!
//! Exterior walls come from the outer boundary of the storey's merged
//! footprint, decomposed into maximal collinear segments. Interior
//! partitions come from the pairwise boundary overlaps of the storey's
//! rectangles. Collinear, directly abutting segments of the same kind are
//! fused; nothing shorter than [`MIN_SEGMENT_LEN`] survives.

use graphbim_core::{Config, Diagnostics, LayoutRect, WallKind, WallSegment, COORD_EPS,
    MIN_SEGMENT_LEN};

use crate::geom2d::{ring_segments_cleaned, shared_boundary, union_footprint, BoundarySegment};

/// Extract the wall set for one storey. Rectangle iteration is in sorted
/// space-id order so the output is stable.
pub fn extract_walls(
    storey_id: &str,
    rects: &[LayoutRect],
    wall_height: f64,
    config: &Config,
) -> (Vec<WallSegment>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();

    let mut on_storey: Vec<&LayoutRect> =
        rects.iter().filter(|r| r.storey_id == storey_id).collect();
    on_storey.sort_by(|a, b| a.space_id.cmp(&b.space_id));
    if on_storey.is_empty() {
        return (Vec::new(), diagnostics);
    }

    // Exterior: outer boundary of every footprint component.
    let mut exterior: Vec<BoundarySegment> = Vec::new();
    for ring in union_footprint(&on_storey) {
        let (segs, dropped) = ring_segments_cleaned(&ring);
        if dropped > 0 {
            diagnostics.warn(
                "geometry.degenerate_wall",
                format!("{dropped} exterior segment(s) below {MIN_SEGMENT_LEN} m dropped"),
                vec![storey_id.to_string()],
            );
        }
        exterior.extend(segs);
    }

    // Interior: pairwise boundary overlaps.
    let mut interior: Vec<BoundarySegment> = Vec::new();
    for i in 0..on_storey.len() {
        for j in (i + 1)..on_storey.len() {
            let (a, b) = (on_storey[i], on_storey[j]);
            let Some(seg) = shared_boundary(a, b) else {
                continue;
            };
            if seg.length() >= MIN_SEGMENT_LEN {
                interior.push(seg);
            } else {
                diagnostics.warn(
                    "geometry.degenerate_wall",
                    format!(
                        "shared boundary of {:.3} m below the wall threshold; partition dropped",
                        seg.length()
                    ),
                    vec![a.space_id.clone(), b.space_id.clone()],
                );
            }
        }
    }

    let exterior = fuse_collinear(exterior);
    let interior = fuse_collinear(interior);

    let mut walls = Vec::with_capacity(exterior.len() + interior.len());
    for seg in exterior {
        walls.push(to_wall(storey_id, &seg, WallKind::Exterior, wall_height, config));
    }
    for seg in interior {
        walls.push(to_wall(storey_id, &seg, WallKind::Interior, wall_height, config));
    }

    tracing::debug!(
        storey = storey_id,
        walls = walls.len(),
        "wall extraction complete"
    );
    (walls, diagnostics)
}

fn to_wall(
    storey_id: &str,
    seg: &BoundarySegment,
    kind: WallKind,
    wall_height: f64,
    config: &Config,
) -> WallSegment {
    WallSegment {
        storey_id: storey_id.to_string(),
        start: seg.start(),
        end: seg.end(),
        thickness: config.wall_thickness,
        height: wall_height,
        kind,
    }
}

/// Fuse collinear, directly abutting segments. Also sorts the result for
/// deterministic output: by axis, then offset, then span start.
fn fuse_collinear(mut segs: Vec<BoundarySegment>) -> Vec<BoundarySegment> {
    segs.sort_by(|a, b| {
        (a.axis, quantize(a.at), quantize(a.lo))
            .cmp(&(b.axis, quantize(b.at), quantize(b.lo)))
    });

    let mut out: Vec<BoundarySegment> = Vec::with_capacity(segs.len());
    for seg in segs {
        if let Some(last) = out.last_mut() {
            let collinear = last.axis == seg.axis && (last.at - seg.at).abs() <= COORD_EPS;
            if collinear && seg.lo <= last.hi + COORD_EPS {
                last.hi = last.hi.max(seg.hi);
                continue;
            }
        }
        out.push(seg);
    }
    out
}

fn quantize(v: f64) -> i64 {
    (v / COORD_EPS).round() as i64
}

/// Convenience wrapper used by the pipeline: split walls per axis kind.
pub fn count_by_kind(walls: &[WallSegment]) -> (usize, usize) {
    let exterior = walls.iter().filter(|w| w.kind == WallKind::Exterior).count();
    (exterior, walls.len() - exterior)
}
