// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration.
//!
//! The core defines no CLI and reads no environment; callers construct a
//! [`Config`] (usually from `Default`) and pass it down explicitly.

use serde::{Deserialize, Serialize};

/// Which layout solver to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    /// BFS-ordered shelf packer with hill-climb refinement.
    Heuristic,
    /// Integer constraint-optimization model with heuristic fallback.
    Cp,
}

/// Configuration record recognized by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default floor-to-ceiling height in metres.
    pub ceiling_height: f64,
    /// Wall thickness in metres.
    pub wall_thickness: f64,
    /// Slab thickness in metres.
    pub slab_thickness: f64,
    /// Door opening width in metres.
    pub door_width: f64,
    /// Door opening height in metres.
    pub door_height: f64,
    /// Target floor area in m² for spaces without an explicit target.
    pub default_target_area: f64,
    /// Minimum rectangle side length in metres.
    pub min_side_length: f64,
    /// Snapping grid in metres.
    pub grid_unit: f64,
    /// Keep only the lowest storey and normalize its elevation to 0.
    pub single_storey_mode: bool,
    pub solver: SolverKind,
    /// Wall-clock limit for the CP solver, in seconds.
    pub solver_time_limit_sec: u64,
    /// Seed for every random draw in the pipeline.
    pub seed: u64,
    /// Envelope slack over the summed target areas.
    pub area_slack_factor: f64,
    /// Weight of the area-deviation term in the CP objective.
    pub objective_area_weight: i64,
    /// Weight of the envelope-perimeter term in the CP objective.
    pub objective_compactness_weight: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ceiling_height: 2.8,
            wall_thickness: 0.15,
            slab_thickness: 0.20,
            door_width: 0.90,
            door_height: 2.00,
            default_target_area: 15.0,
            min_side_length: 1.5,
            grid_unit: 0.05,
            single_storey_mode: false,
            solver: SolverKind::Heuristic,
            solver_time_limit_sec: 30,
            seed: 42,
            area_slack_factor: 1.15,
            objective_area_weight: 10,
            objective_compactness_weight: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.solver, SolverKind::Heuristic);
        assert!((cfg.ceiling_height - 2.8).abs() < 1e-9);
        assert!((cfg.grid_unit - 0.05).abs() < 1e-9);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.solver_time_limit_sec, 30);
    }
}
