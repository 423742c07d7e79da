// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constraint-optimization layout solver.
//!
//! Each storey is modelled on an integer grid (one unit = `grid_unit`
//! metres). Per space the model carries (x, y, w, h) with domains derived
//! from the envelope and the minimum side, a 2-D non-overlap constraint
//! over all placed intervals, and an area floor `w·h ≥ min_area`. The
//! objective minimizes
//!
//! ```text
//! Σ area_weight · |w·h − target_area|  +  compactness_weight · envelope perimeter slack
//! ```
//!
//! The search is branch-and-bound over candidate dimensions and
//! bottom-left anchor positions, with seeded randomized restarts. It is
//! bounded by a deterministic node budget (so a fixed seed reproduces the
//! incumbent exactly) and secondarily by the configured wall-clock limit.
//! When no incumbent exists at cut-off the caller falls back to the
//! heuristic solver.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use graphbim_core::{Config, Error, LayoutRect, Result, Space};
use graphbim_topology::Topology;

use crate::heuristic::MAX_SIDE;

/// Candidate (w, h) pairs kept per space.
const MAX_DIM_CANDIDATES: usize = 12;

/// Anchor positions branched per space and dimension choice.
const MAX_POSITIONS: usize = 8;

/// Deterministic search budget: nodes per space on a storey.
const NODES_PER_SPACE: u64 = 20_000;

pub struct CpSolver;

impl CpSolver {
    /// Solve every storey, or fail with [`Error::LayoutInfeasible`] when
    /// any storey has no incumbent within the budget.
    pub fn solve(topology: &Topology, config: &Config) -> Result<Vec<LayoutRect>> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let deadline = Instant::now() + Duration::from_secs(config.solver_time_limit_sec);
        let mut rects = Vec::new();

        for storey in topology.storeys() {
            let spaces = topology.spaces_on_storey(&storey.id);
            if spaces.is_empty() {
                continue;
            }
            let placed = solve_storey(&storey.id, &spaces, config, &mut rng, deadline)?;
            rects.extend(placed);
        }
        Ok(rects)
    }
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    x: i64,
    y: i64,
    w: i64,
    h: i64,
}

struct SpaceModel {
    id: String,
    /// Candidate (w, h, area_cost) triples, best first.
    dims: Vec<(i64, i64, i64)>,
}

struct Search {
    env: i64,
    coord_bound: i64,
    compactness_weight: i64,
    nodes_left: u64,
    deadline: Instant,
    best_cost: i64,
    best: Option<Vec<Placement>>,
}

fn solve_storey(
    storey_id: &str,
    spaces: &[&Space],
    config: &Config,
    rng: &mut StdRng,
    deadline: Instant,
) -> Result<Vec<LayoutRect>> {
    let unit = config.grid_unit;
    let min_side = units(config.min_side_length, unit).max(1);
    let max_dim = units(MAX_SIDE, unit).max(min_side);

    // Largest targets first: the hardest rectangles branch at the top.
    let mut ordered: Vec<&Space> = spaces.to_vec();
    ordered.sort_by(|a, b| {
        let ta = a.effective_target_area(config.default_target_area);
        let tb = b.effective_target_area(config.default_target_area);
        tb.partial_cmp(&ta)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    let total_target: f64 = ordered
        .iter()
        .map(|sp| {
            sp.effective_target_area(config.default_target_area)
                .max(sp.effective_min_area(config.min_side_length))
        })
        .sum();
    let env = units(
        (total_target * config.area_slack_factor).sqrt(),
        unit,
    )
    .max(min_side);
    let coord_bound = env * 3;

    let mut models = Vec::with_capacity(ordered.len());
    for sp in &ordered {
        let model = build_space_model(sp, config, min_side, max_dim.min(coord_bound))?;
        models.push(model);
    }

    let mut search = Search {
        env,
        coord_bound,
        compactness_weight: config.objective_compactness_weight,
        nodes_left: NODES_PER_SPACE * models.len() as u64,
        deadline,
        best_cost: i64::MAX,
        best: None,
    };

    // First descent with the deterministic candidate order, then seeded
    // restarts until the budget runs out. A zero-cost incumbent cannot be
    // improved, so it stops the search outright.
    let mut placed = Vec::with_capacity(models.len());
    descend(&models, 0, &mut placed, 0, &mut search);
    while search.nodes_left > 0 && search.best_cost > 0 && Instant::now() < search.deadline {
        for model in &mut models {
            model.dims.shuffle(rng);
        }
        let mut placed = Vec::with_capacity(models.len());
        descend(&models, 0, &mut placed, 0, &mut search);
    }

    let best = search.best.ok_or_else(|| {
        Error::LayoutInfeasible(format!("no incumbent for storey '{storey_id}'"))
    })?;

    tracing::debug!(
        storey = storey_id,
        cost = search.best_cost,
        spaces = best.len(),
        "cp incumbent accepted"
    );

    Ok(best
        .iter()
        .zip(&models)
        .map(|(p, m)| {
            LayoutRect::new(
                m.id.clone(),
                storey_id,
                p.x as f64 * unit,
                p.y as f64 * unit,
                p.w as f64 * unit,
                p.h as f64 * unit,
            )
        })
        .collect())
}

fn units(metres: f64, unit: f64) -> i64 {
    (metres / unit).round() as i64
}

/// Enumerate candidate integer dimensions for one space: every candidate
/// satisfies the min-side domain, the area floor and the aspect hints.
fn build_space_model(
    sp: &Space,
    config: &Config,
    min_side: i64,
    max_dim: i64,
) -> Result<SpaceModel> {
    let unit = config.grid_unit;
    let target = sp
        .effective_target_area(config.default_target_area)
        .max(sp.effective_min_area(config.min_side_length));
    let target_area = ((target / (unit * unit)).round() as i64).max(min_side * min_side);
    let min_area = ((sp.effective_min_area(config.min_side_length) / (unit * unit)).round()
        as i64)
        .max(1);

    // 0.25 m dimension step keeps the candidate set small without losing
    // the near-square optimum (the exact square root is always included).
    let step = (units(0.25, unit)).max(1);
    let square = ((target_area as f64).sqrt().round() as i64).clamp(min_side, max_dim);

    let mut widths: Vec<i64> = (min_side..=max_dim).step_by(step as usize).collect();
    if !widths.contains(&square) {
        widths.push(square);
    }

    let mut dims: Vec<(i64, i64, i64)> = Vec::new();
    for w in widths {
        let mut h = ((target_area + w - 1) / w).clamp(min_side, max_dim);
        if w * h < min_area {
            h = ((min_area + w - 1) / w).clamp(min_side, max_dim);
        }
        if w * h < min_area {
            continue;
        }
        if !aspect_ok(sp, w, h) {
            continue;
        }
        let cost = config.objective_area_weight * (w * h - target_area).abs();
        dims.push((w, h, cost));
    }
    dims.sort_by_key(|&(w, h, cost)| (cost, w + h, w));
    dims.dedup_by_key(|d| (d.0, d.1));
    dims.truncate(MAX_DIM_CANDIDATES);

    if dims.is_empty() {
        return Err(Error::LayoutInfeasible(format!(
            "space '{}' has no dimension candidate within its domains",
            sp.id
        )));
    }
    Ok(SpaceModel {
        id: sp.id.clone(),
        dims,
    })
}

fn aspect_ok(sp: &Space, w: i64, h: i64) -> bool {
    let ratio = w as f64 / h as f64;
    if let Some(lo) = sp.aspect_ratio_min {
        if ratio < lo - 1e-9 {
            return false;
        }
    }
    if let Some(hi) = sp.aspect_ratio_max {
        if ratio > hi + 1e-9 {
            return false;
        }
    }
    true
}

/// Depth-first branch-and-bound. `cost_so_far` (area terms only) is a
/// lower bound on any completion, so it prunes against the incumbent.
fn descend(
    models: &[SpaceModel],
    idx: usize,
    placed: &mut Vec<Placement>,
    cost_so_far: i64,
    search: &mut Search,
) {
    if search.nodes_left == 0 || cost_so_far >= search.best_cost {
        return;
    }
    search.nodes_left -= 1;
    if search.nodes_left % 4096 == 0 && Instant::now() >= search.deadline {
        search.nodes_left = 0;
        return;
    }

    if idx == models.len() {
        let total = cost_so_far + compactness_cost(placed, search);
        if total < search.best_cost {
            search.best_cost = total;
            search.best = Some(placed.clone());
        }
        return;
    }

    let model = &models[idx];
    for &(w, h, dim_cost) in &model.dims {
        if cost_so_far + dim_cost >= search.best_cost {
            continue;
        }
        for (x, y) in anchor_positions(placed, w, h, search) {
            placed.push(Placement { x, y, w, h });
            descend(models, idx + 1, placed, cost_so_far + dim_cost, search);
            placed.pop();
            if search.nodes_left == 0 {
                return;
            }
        }
    }
}

/// Bottom-left anchor candidates: the origin plus corners induced by the
/// rectangles already placed, non-overlapping and inside the coordinate
/// bound.
fn anchor_positions(placed: &[Placement], w: i64, h: i64, search: &Search) -> Vec<(i64, i64)> {
    let mut xs = vec![0];
    let mut ys = vec![0];
    for p in placed {
        xs.push(p.x + p.w);
        xs.push(p.x);
        ys.push(p.y + p.h);
        ys.push(p.y);
    }
    xs.sort_unstable();
    xs.dedup();
    ys.sort_unstable();
    ys.dedup();

    let mut anchors = Vec::new();
    for &y in &ys {
        for &x in &xs {
            if x + w > search.coord_bound || y + h > search.coord_bound {
                continue;
            }
            let overlaps = placed.iter().any(|p| {
                x < p.x + p.w && p.x < x + w && y < p.y + p.h && p.y < y + h
            });
            if !overlaps {
                anchors.push((x, y));
            }
        }
    }
    anchors.sort_by_key(|&(x, y)| (y, x));
    anchors.truncate(MAX_POSITIONS);
    anchors
}

/// Envelope perimeter slack beyond the near-square estimate.
fn compactness_cost(placed: &[Placement], search: &Search) -> i64 {
    let bbox_w = placed.iter().map(|p| p.x + p.w).max().unwrap_or(0);
    let bbox_h = placed.iter().map(|p| p.y + p.h).max().unwrap_or(0);
    let slack = (bbox_w - search.env).max(0) + (bbox_h - search.env).max(0);
    search.compactness_weight * 2 * slack
}
