// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout validation and the constraints report.
//!
//! The report carries numbers, not strings: overlap pairs with their
//! intersection area, relative area deviation per space, and the fraction
//! of satisfied adjacencies. Violations are recorded as warnings; nothing
//! here aborts the pipeline.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use graphbim_core::{Config, Diagnostic, Diagnostics, LayoutRect, COORD_EPS};
use graphbim_topology::Topology;

/// Relative deviation beyond which a warning is recorded.
const AREA_DEVIATION_WARN: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapPair {
    pub space_a: String,
    pub space_b: String,
    /// Intersection area in m².
    pub area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaDeviation {
    /// Mean of the signed relative deviations.
    pub mean: f64,
    /// Deviation with the largest magnitude (signed).
    pub max: f64,
    /// `(actual − target) / target` per space.
    pub per_space: BTreeMap<String, f64>,
}

/// Structured layout evaluation, serializable as the constraints report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    pub overlap_pairs: Vec<OverlapPair>,
    pub area_deviation: AreaDeviation,
    /// Fraction of adjacency/connection edges whose rectangles share a
    /// boundary segment of positive length. 1.0 when there are no edges.
    pub adjacency_satisfied: f64,
    pub warnings: Vec<Diagnostic>,
}

/// Evaluate a placement against its topology. `carried` diagnostics from
/// earlier stages are folded into the report's warnings.
pub fn evaluate_layout(
    rects: &[LayoutRect],
    topology: &Topology,
    config: &Config,
    carried: Diagnostics,
) -> LayoutReport {
    let mut warnings = Diagnostics::new();
    warnings.extend(carried);

    let by_id: FxHashMap<&str, &LayoutRect> =
        rects.iter().map(|r| (r.space_id.as_str(), r)).collect();

    // Placement uniqueness and storey containment.
    for sp in topology.spaces() {
        match by_id.get(sp.id.as_str()) {
            None => warnings.warn(
                "layout.missing_rect",
                "space has no layout rectangle",
                vec![sp.id.clone()],
            ),
            Some(r) if r.storey_id != sp.storey_ref() => warnings.warn(
                "layout.storey_mismatch",
                "rectangle storey does not match the space's storey",
                vec![sp.id.clone(), r.storey_id.clone()],
            ),
            Some(_) => {}
        }
    }

    // Pairwise overlap within each storey.
    let mut overlap_pairs = Vec::new();
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            let (a, b) = (&rects[i], &rects[j]);
            if a.storey_id != b.storey_id {
                continue;
            }
            let area = a.intersection_area(b);
            if area > COORD_EPS {
                let (sa, sb) = if a.space_id <= b.space_id {
                    (a.space_id.clone(), b.space_id.clone())
                } else {
                    (b.space_id.clone(), a.space_id.clone())
                };
                warnings.warn(
                    "layout.overlap",
                    format!("rectangles overlap by {area:.3} m²"),
                    vec![sa.clone(), sb.clone()],
                );
                overlap_pairs.push(OverlapPair {
                    space_a: sa,
                    space_b: sb,
                    area,
                });
            }
        }
    }
    overlap_pairs.sort_by(|p, q| (&p.space_a, &p.space_b).cmp(&(&q.space_a, &q.space_b)));

    // Area deviation.
    let mut per_space = BTreeMap::new();
    for sp in topology.spaces() {
        if let Some(r) = by_id.get(sp.id.as_str()) {
            let target = sp.effective_target_area(config.default_target_area);
            if target > 0.0 {
                let dev = (r.area() - target) / target;
                if dev.abs() > AREA_DEVIATION_WARN {
                    warnings.warn(
                        "layout.area_deviation",
                        format!("area deviates from target by {:.0}%", dev * 100.0),
                        vec![sp.id.clone()],
                    );
                }
                per_space.insert(sp.id.clone(), dev);
            }
        }
    }
    let mean = if per_space.is_empty() {
        0.0
    } else {
        per_space.values().sum::<f64>() / per_space.len() as f64
    };
    let max = per_space
        .values()
        .copied()
        .max_by(|a, b| {
            a.abs()
                .partial_cmp(&b.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(0.0);

    // Adjacency satisfaction over adjacency and connection edges.
    let mut desired: Vec<&(String, String)> = topology
        .adjacency_pairs()
        .iter()
        .chain(topology.connected_pairs())
        .collect();
    desired.sort();
    desired.dedup();

    let satisfied = desired
        .iter()
        .filter(|(a, b)| {
            matches!(
                (by_id.get(a.as_str()), by_id.get(b.as_str())),
                (Some(&ra), Some(&rb))
                    if ra.storey_id == rb.storey_id && ra.shared_edge_length(rb) > 0.0
            )
        })
        .count();
    let adjacency_satisfied = if desired.is_empty() {
        1.0
    } else {
        satisfied as f64 / desired.len() as f64
    };

    tracing::debug!(
        overlaps = overlap_pairs.len(),
        adjacency_satisfied,
        mean_deviation = mean,
        "layout evaluated"
    );

    LayoutReport {
        overlap_pairs,
        area_deviation: AreaDeviation {
            mean,
            max,
            per_space,
        },
        adjacency_satisfied,
        warnings: warnings.into_vec(),
    }
}
