// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # graphbim Layout
//!
//! Places axis-aligned rectangles for every space of a topology, respecting
//! adjacency, non-overlap, target areas and per-storey envelopes. Two
//! solvers share the single contract `solve(topology, config) → rects`:
//! a heuristic shelf packer and an integer constraint-optimization model.
//! Post-processing snaps to the grid and re-origins each storey; the
//! validator turns the placement into a numeric constraints report.

pub mod artifacts;
pub mod cp;
pub mod heuristic;
pub mod postprocess;
pub mod report;

pub use artifacts::{
    write_layout_geojson, write_layout_json, write_report_json, LayoutDump, RectDump, StoreyDump,
};
pub use cp::CpSolver;
pub use heuristic::HeuristicSolver;
pub use postprocess::{
    filter_single_storey, postprocess, reorigin_storeys, snap_to_grid, StoreyExtent,
};
pub use report::{evaluate_layout, AreaDeviation, LayoutReport, OverlapPair};

use graphbim_core::{Config, Diagnostics, LayoutRect, SolverKind};
use graphbim_topology::Topology;

/// Run the configured solver. The CP solver recovers from infeasibility by
/// falling back to the heuristic; the fallback is recorded as a warning,
/// never an error.
pub fn solve_layout(topology: &Topology, config: &Config) -> (Vec<LayoutRect>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let rects = match config.solver {
        SolverKind::Heuristic => HeuristicSolver::solve(topology, config),
        SolverKind::Cp => match CpSolver::solve(topology, config) {
            Ok(rects) => rects,
            Err(err) => {
                tracing::warn!(error = %err, "cp solver failed, falling back to heuristic");
                diagnostics.warn(
                    "layout.cp_fallback",
                    format!("constraint solver produced no placement ({err}); heuristic fallback used"),
                    vec![],
                );
                HeuristicSolver::solve(topology, config)
            }
        },
    };
    (rects, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphbim_core::{Space, Storey};

    fn tiny_topology() -> Topology {
        Topology::from_parts(
            vec![Storey {
                id: "L1".into(),
                name: None,
                elevation: 0.0,
                index: 0,
            }],
            vec![Space {
                id: "a".into(),
                name: None,
                category: None,
                target_area: Some(16.0),
                min_area: None,
                ceiling_height: None,
                aspect_ratio_min: None,
                aspect_ratio_max: None,
                storey_id: Some("L1".into()),
            }],
            vec![],
            vec![],
            vec![],
        )
    }

    #[test]
    fn heuristic_dispatch() {
        let (rects, diags) = solve_layout(&tiny_topology(), &Config::default());
        assert_eq!(rects.len(), 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn cp_dispatch_places_spaces() {
        let cfg = Config {
            solver: SolverKind::Cp,
            grid_unit: 0.5,
            ..Config::default()
        };
        let (rects, _diags) = solve_layout(&tiny_topology(), &cfg);
        assert_eq!(rects.len(), 1);
    }
}
