// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door placement on shared boundaries.
//!
//! Every connection edge whose rectangles sit on the same storey and
//! share a boundary at least `door_width` long gets one door at the
//! boundary midpoint. Everything else is dropped with a warning — a
//! connection never causes failure.

use rustc_hash::FxHashMap;

use graphbim_core::{Config, Diagnostics, DoorOpening, DoorOrientation, LayoutRect};
use graphbim_topology::Topology;

use crate::geom2d::{shared_boundary, Axis};

/// Clearance kept on both sides of a clipped door opening (metres).
const MIN_JAMB: f64 = 0.10;

/// Extract doors for every connection edge of the topology.
pub fn extract_doors(
    topology: &Topology,
    rects: &[LayoutRect],
    config: &Config,
) -> (Vec<DoorOpening>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let by_id: FxHashMap<&str, &LayoutRect> =
        rects.iter().map(|r| (r.space_id.as_str(), r)).collect();

    let mut pairs: Vec<&(String, String)> = topology.connected_pairs().iter().collect();
    pairs.sort();

    let mut doors = Vec::new();
    for (a, b) in pairs {
        let (Some(&ra), Some(&rb)) = (by_id.get(a.as_str()), by_id.get(b.as_str())) else {
            diagnostics.warn(
                "geometry.door_missing_rect",
                "connection endpoint has no placed rectangle; door dropped",
                vec![a.clone(), b.clone()],
            );
            continue;
        };
        if ra.storey_id != rb.storey_id {
            diagnostics.warn(
                "geometry.door_cross_storey",
                "connected spaces sit on different storeys; door dropped",
                vec![a.clone(), b.clone()],
            );
            continue;
        }
        let Some(seg) = shared_boundary(ra, rb) else {
            diagnostics.warn(
                "geometry.door_insufficient_boundary",
                "connected spaces share no boundary segment; door dropped",
                vec![a.clone(), b.clone()],
            );
            continue;
        };
        if seg.length() < config.door_width {
            diagnostics.warn(
                "geometry.door_insufficient_boundary",
                format!(
                    "shared boundary of {:.3} m is shorter than the door width; door dropped",
                    seg.length()
                ),
                vec![a.clone(), b.clone()],
            );
            continue;
        }

        let width = config.door_width.min(seg.length() - 2.0 * MIN_JAMB);
        doors.push(DoorOpening {
            space_a: a.clone(),
            space_b: b.clone(),
            storey_id: ra.storey_id.clone(),
            position: seg.midpoint(),
            orientation: match seg.axis {
                Axis::X => DoorOrientation::Horizontal,
                Axis::Y => DoorOrientation::Vertical,
            },
            width,
            height: config.door_height,
        });
    }

    tracing::debug!(doors = doors.len(), "door extraction complete");
    (doors, diagnostics)
}
