// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # graphbim Geometry
//!
//! Parametric 2-D geometry synthesis: turns solved layout rectangles into
//! non-degenerate wall segments (exterior envelope plus interior
//! partitions), per-storey merged slabs with matching roofs, and door
//! openings on shared boundaries.
//!
//! All geometric comparisons use explicit epsilons; inputs are expected to
//! be grid-snapped before any boundary-sharing test.

pub mod doors;
pub mod geom2d;
pub mod slabs;
pub mod walls;

pub use doors::extract_doors;
pub use geom2d::{
    shared_boundary, signed_area, simplify_ring, union_footprint, Axis, BoundarySegment,
};
pub use slabs::extract_slabs;
pub use walls::extract_walls;

use graphbim_core::{Config, Space};

/// Wall/roof height for a storey: the tallest ceiling among its spaces,
/// falling back to the configured default.
pub fn storey_ceiling_height(spaces: &[&Space], config: &Config) -> f64 {
    let tallest = spaces
        .iter()
        .filter_map(|sp| sp.ceiling_height)
        .fold(0.0_f64, f64::max);
    if tallest > 0.0 {
        tallest
    } else {
        config.ceiling_height
    }
}
