// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heuristic layout solver.
//!
//! Strategy, per storey:
//! 1. Order spaces by BFS from the space with the most adjacency edges;
//!    disconnected components are appended in descending size order.
//! 2. Compute initial square dimensions from the target area.
//! 3. Pack rectangles into a near-square envelope with a shelf algorithm,
//!    extending the envelope rather than dropping a space.
//! 4. Hill-climb: random position swaps that improve the adjacency
//!    objective without introducing overlap.
//!
//! Every space receives a rectangle; overlap is impossible by construction.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::{FxHashMap, FxHashSet};

use graphbim_core::{Config, LayoutRect, Space, COORD_EPS};
use graphbim_topology::Topology;

/// Upper clip for an initial rectangle side (metres).
pub(crate) const MAX_SIDE: f64 = 30.0;

/// Hill-climb iterations per space on a storey.
const CLIMB_ITERATIONS_PER_SPACE: usize = 200;

/// Weight of the envelope-perimeter term in the climb objective.
const PERIMETER_WEIGHT: f64 = 0.1;

pub struct HeuristicSolver;

impl HeuristicSolver {
    /// Place every space of the topology. Deterministic under
    /// `config.seed`.
    pub fn solve(topology: &Topology, config: &Config) -> Vec<LayoutRect> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut rects = Vec::new();

        for storey in topology.storeys() {
            let spaces = topology.spaces_on_storey(&storey.id);
            if spaces.is_empty() {
                continue;
            }
            let components = bfs_components(topology, &spaces);
            let dims = initial_dimensions(&spaces, config);
            let mut storey_rects = pack_storey(&storey.id, &components, &dims, config);
            hill_climb(topology, &mut storey_rects, &mut rng);
            tracing::debug!(
                storey = %storey.id,
                spaces = storey_rects.len(),
                "heuristic placement complete"
            );
            rects.extend(storey_rects);
        }
        rects
    }
}

/// Initial square side from the target area, clipped to
/// `[min_side, MAX_SIDE]` and snapped to the grid. The minimum side wins
/// over a smaller target area. Aspect-ratio hints stretch the square.
fn initial_dimensions(spaces: &[&Space], config: &Config) -> FxHashMap<String, (f64, f64)> {
    let grid = config.grid_unit;
    let mut dims = FxHashMap::default();
    for sp in spaces {
        let target = sp
            .effective_target_area(config.default_target_area)
            .max(sp.effective_min_area(config.min_side_length));
        let side = target.sqrt().clamp(config.min_side_length, MAX_SIDE);

        let (mut w, mut h) = (side, side);
        if let Some(ratio) = preferred_ratio(sp) {
            let f = ratio.sqrt();
            w = (side * f).clamp(config.min_side_length, MAX_SIDE);
            h = (side / f).clamp(config.min_side_length, MAX_SIDE);
        }
        let w = snap_dim(w, grid, config.min_side_length);
        let h = snap_dim(h, grid, config.min_side_length);
        dims.insert(sp.id.clone(), (w, h));
    }
    dims
}

fn snap_dim(v: f64, grid: f64, min_side: f64) -> f64 {
    ((v / grid).round() * grid).max(min_side)
}

/// Width/height ratio implied by the aspect hints, when 1.0 falls outside
/// the hinted range.
fn preferred_ratio(sp: &Space) -> Option<f64> {
    match (sp.aspect_ratio_min, sp.aspect_ratio_max) {
        (Some(lo), _) if lo > 1.0 => Some(lo),
        (_, Some(hi)) if hi < 1.0 => Some(hi),
        _ => None,
    }
}

/// Gap between disconnected component blocks on the same storey (metres).
/// Keeps their footprints (and therefore their slabs) separate.
const COMPONENT_GAP: f64 = 1.0;

/// Connected components of the storey's adjacency subgraph, largest first,
/// each ordered by BFS from its highest-degree member (ties broken by id).
fn bfs_components(topology: &Topology, spaces: &[&Space]) -> Vec<Vec<String>> {
    let on_storey: FxHashSet<&str> = spaces.iter().map(|s| s.id.as_str()).collect();

    let mut components: Vec<Vec<&str>> = Vec::new();
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut ids: Vec<&str> = on_storey.iter().copied().collect();
    ids.sort_unstable();

    for &start in &ids {
        if visited.contains(start) {
            continue;
        }
        let mut members = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(start);
        visited.insert(start);
        while let Some(id) = queue.pop_front() {
            members.push(id);
            for n in topology.neighbors(id) {
                if on_storey.contains(n) && visited.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        members.sort_unstable();
        components.push(members);
    }
    components.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(b[0])));

    components
        .into_iter()
        .map(|members| {
            let member_set: FxHashSet<&str> = members.iter().copied().collect();
            let root = members
                .iter()
                .copied()
                .max_by(|a, b| {
                    topology
                        .degree(a)
                        .cmp(&topology.degree(b))
                        .then_with(|| b.cmp(a))
                })
                .expect("component is non-empty");

            let mut order = Vec::with_capacity(members.len());
            let mut seen: FxHashSet<&str> = FxHashSet::default();
            let mut queue = std::collections::VecDeque::new();
            queue.push_back(root);
            seen.insert(root);
            while let Some(id) = queue.pop_front() {
                order.push(id.to_string());
                for n in topology.neighbors(id) {
                    if member_set.contains(n) && seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
            order
        })
        .collect()
}

/// Pack each component into its own near-square envelope, then arrange the
/// component blocks compactly with a separating gap so disconnected
/// components never fuse into one footprint.
fn pack_storey(
    storey_id: &str,
    components: &[Vec<String>],
    dims: &FxHashMap<String, (f64, f64)>,
    config: &Config,
) -> Vec<LayoutRect> {
    let mut blocks: Vec<(Vec<LayoutRect>, f64, f64)> = components
        .iter()
        .map(|order| {
            let rects = shelf_pack(storey_id, order, dims, config);
            let bw = rects.iter().map(|r| r.x2()).fold(0.0_f64, f64::max);
            let bh = rects.iter().map(|r| r.y2()).fold(0.0_f64, f64::max);
            (rects, bw, bh)
        })
        .collect();

    if blocks.len() == 1 {
        return blocks.remove(0).0;
    }

    // The gap columns consume width too, so they count toward the
    // near-square envelope estimate.
    let total_area: f64 = blocks.iter().map(|(_, w, h)| (w + COMPONENT_GAP) * h).sum();
    let max_w = blocks.iter().map(|(_, w, _)| *w).fold(0.0_f64, f64::max);
    let envelope_w = (total_area * config.area_slack_factor).sqrt().max(max_w);

    let mut rects = Vec::new();
    let mut x = 0.0;
    let mut y = 0.0;
    let mut row_h = 0.0_f64;
    for (block, bw, bh) in blocks {
        if x > 0.0 && x + bw > envelope_w + COORD_EPS {
            y += row_h + COMPONENT_GAP;
            x = 0.0;
            row_h = 0.0;
        }
        for mut r in block {
            r.x += x;
            r.y += y;
            rects.push(r);
        }
        x += bw + COMPONENT_GAP;
        row_h = row_h.max(bh);
    }
    rects
}

/// Shelf packing into a near-square envelope derived from the summed
/// target areas and the slack factor.
fn shelf_pack(
    storey_id: &str,
    order: &[String],
    dims: &FxHashMap<String, (f64, f64)>,
    config: &Config,
) -> Vec<LayoutRect> {
    let total_area: f64 = order.iter().map(|id| {
        let (w, h) = dims[id];
        w * h
    }).sum();
    let max_w = order
        .iter()
        .map(|id| dims[id].0)
        .fold(0.0_f64, f64::max);
    let envelope_w = (total_area * config.area_slack_factor).sqrt().max(max_w);

    let mut rects = Vec::with_capacity(order.len());
    let mut x = 0.0;
    let mut y = 0.0;
    let mut shelf_h = 0.0_f64;

    for id in order {
        let (w, h) = dims[id];
        if x > 0.0 && x + w > envelope_w + COORD_EPS {
            y += shelf_h;
            x = 0.0;
            shelf_h = 0.0;
        }
        rects.push(LayoutRect::new(id.clone(), storey_id, x, y, w, h));
        x += w;
        shelf_h = shelf_h.max(h);
    }
    rects
}

/// Random pairwise position swaps, accepted when they strictly improve
/// `satisfied adjacencies − 0.1 · envelope perimeter` without overlap.
fn hill_climb(topology: &Topology, rects: &mut [LayoutRect], rng: &mut StdRng) {
    if rects.len() < 2 {
        return;
    }
    let desired = desired_pairs(topology, rects);
    if desired.is_empty() {
        return;
    }

    let mut best = objective(rects, &desired);
    let iterations = CLIMB_ITERATIONS_PER_SPACE * rects.len();

    for _ in 0..iterations {
        let i = rng.gen_range(0..rects.len());
        let j = rng.gen_range(0..rects.len());
        if i == j {
            continue;
        }
        swap_positions(rects, i, j);
        if has_overlap(rects) {
            swap_positions(rects, i, j);
            continue;
        }
        let score = objective(rects, &desired);
        if score > best {
            best = score;
        } else {
            swap_positions(rects, i, j);
        }
    }
}

fn desired_pairs(topology: &Topology, rects: &[LayoutRect]) -> Vec<(String, String)> {
    let placed: FxHashSet<&str> = rects.iter().map(|r| r.space_id.as_str()).collect();
    let mut pairs: Vec<(String, String)> = topology
        .adjacency_pairs()
        .iter()
        .chain(topology.connected_pairs())
        .filter(|(a, b)| placed.contains(a.as_str()) && placed.contains(b.as_str()))
        .cloned()
        .collect();
    pairs.sort();
    pairs.dedup();
    pairs
}

fn objective(rects: &[LayoutRect], desired: &[(String, String)]) -> f64 {
    let by_id: FxHashMap<&str, &LayoutRect> =
        rects.iter().map(|r| (r.space_id.as_str(), r)).collect();
    let satisfied = desired
        .iter()
        .filter(|(a, b)| {
            matches!((by_id.get(a.as_str()), by_id.get(b.as_str())), (Some(&ra), Some(&rb))
                if ra.shared_edge_length(rb) > 0.0)
        })
        .count() as f64;

    let min_x = rects.iter().map(|r| r.x).fold(f64::MAX, f64::min);
    let min_y = rects.iter().map(|r| r.y).fold(f64::MAX, f64::min);
    let max_x = rects.iter().map(|r| r.x2()).fold(f64::MIN, f64::max);
    let max_y = rects.iter().map(|r| r.y2()).fold(f64::MIN, f64::max);
    let perimeter = 2.0 * ((max_x - min_x) + (max_y - min_y));

    satisfied - PERIMETER_WEIGHT * perimeter
}

fn swap_positions(rects: &mut [LayoutRect], i: usize, j: usize) {
    let (xi, yi) = (rects[i].x, rects[i].y);
    rects[i].x = rects[j].x;
    rects[i].y = rects[j].y;
    rects[j].x = xi;
    rects[j].y = yi;
}

fn has_overlap(rects: &[LayoutRect]) -> bool {
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects[i].intersection_area(&rects[j]) > COORD_EPS {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphbim_core::Storey;

    fn space(id: &str, storey: &str, target: f64) -> Space {
        Space {
            id: id.into(),
            name: Some(id.into()),
            category: None,
            target_area: Some(target),
            min_area: None,
            ceiling_height: None,
            aspect_ratio_min: None,
            aspect_ratio_max: None,
            storey_id: Some(storey.into()),
        }
    }

    fn storey(id: &str, elevation: f64, index: u32) -> Storey {
        Storey {
            id: id.into(),
            name: None,
            elevation,
            index,
        }
    }

    fn topo(spaces: Vec<Space>, adjacency: Vec<(&str, &str)>) -> Topology {
        let mut storey_ids: Vec<String> = spaces
            .iter()
            .map(|s| s.storey_ref().to_string())
            .collect();
        storey_ids.sort();
        storey_ids.dedup();
        let storeys = storey_ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| storey(&id, i as f64 * 3.0, i as u32))
            .collect();
        Topology::from_parts(
            storeys,
            spaces,
            adjacency
                .into_iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            vec![],
            vec![],
        )
    }

    #[test]
    fn every_space_gets_exactly_one_rect() {
        let t = topo(
            vec![
                space("a", "L1", 16.0),
                space("b", "L1", 12.0),
                space("c", "L1", 20.0),
            ],
            vec![("a", "b"), ("b", "c")],
        );
        let rects = HeuristicSolver::solve(&t, &Config::default());
        assert_eq!(rects.len(), 3);
        let mut ids: Vec<&str> = rects.iter().map(|r| r.space_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn single_space_square_from_target() {
        let t = topo(vec![space("r1", "L1", 16.0)], vec![]);
        let rects = HeuristicSolver::solve(&t, &Config::default());
        assert_eq!(rects.len(), 1);
        assert!((rects[0].width - 4.0).abs() < 1e-9);
        assert!((rects[0].height - 4.0).abs() < 1e-9);
    }

    #[test]
    fn no_overlaps_by_construction() {
        let t = topo(
            (0..8)
                .map(|i| space(&format!("s{i}"), "L1", 10.0 + i as f64))
                .collect(),
            vec![("s0", "s1"), ("s1", "s2"), ("s2", "s3"), ("s4", "s5")],
        );
        let rects = HeuristicSolver::solve(&t, &Config::default());
        assert!(!has_overlap(&rects));
    }

    #[test]
    fn deterministic_under_fixed_seed() {
        let t = topo(
            (0..6)
                .map(|i| space(&format!("s{i}"), "L1", 12.0 + i as f64))
                .collect(),
            vec![("s0", "s1"), ("s2", "s3"), ("s1", "s4")],
        );
        let cfg = Config::default();
        let first = HeuristicSolver::solve(&t, &cfg);
        let second = HeuristicSolver::solve(&t, &cfg);
        assert_eq!(first, second);
    }

    #[test]
    fn min_side_wins_over_tiny_target() {
        let t = topo(vec![space("tiny", "L1", 0.5)], vec![]);
        let cfg = Config::default();
        let rects = HeuristicSolver::solve(&t, &cfg);
        assert!(rects[0].width >= cfg.min_side_length - 1e-9);
        assert!(rects[0].height >= cfg.min_side_length - 1e-9);
    }

    #[test]
    fn storeys_are_packed_independently() {
        let t = topo(
            vec![
                space("a", "L1", 16.0),
                space("b", "L1", 16.0),
                space("c", "L2", 16.0),
                space("d", "L2", 16.0),
            ],
            vec![("a", "b"), ("c", "d")],
        );
        let rects = HeuristicSolver::solve(&t, &Config::default());
        assert_eq!(rects.len(), 4);
        for r in &rects {
            let sp_storey = t.space(&r.space_id).unwrap().storey_ref();
            assert_eq!(r.storey_id, sp_storey);
        }
    }

    #[test]
    fn disconnected_components_stay_separated() {
        let t = topo(
            vec![
                space("a", "L1", 15.0),
                space("b", "L1", 15.0),
                space("x", "L1", 15.0),
                space("y", "L1", 15.0),
            ],
            vec![("a", "b"), ("x", "y")],
        );
        let rects = HeuristicSolver::solve(&t, &Config::default());
        let find = |id: &str| rects.iter().find(|r| r.space_id == id).unwrap();
        for p in ["a", "b"] {
            for q in ["x", "y"] {
                assert_eq!(find(p).shared_edge_length(find(q)), 0.0);
                assert_eq!(find(p).intersection_area(find(q)), 0.0);
            }
        }
    }

    #[test]
    fn adjacent_pair_ends_up_touching() {
        let t = topo(
            vec![space("a", "L1", 16.0), space("b", "L1", 16.0)],
            vec![("a", "b")],
        );
        let rects = HeuristicSolver::solve(&t, &Config::default());
        assert!(rects[0].shared_edge_length(&rects[1]) > 0.0);
    }
}
