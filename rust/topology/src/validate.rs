// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topology validation.
//!
//! Returns structured diagnostics; the pipeline aborts only on ERROR
//! severity. Warnings (missing names, missing area targets) flow into the
//! constraints report instead of being silenced.

use rustc_hash::{FxHashMap, FxHashSet};

use graphbim_core::{Diagnostics, DEFAULT_STOREY_ID};

use crate::graph::Topology;

/// Run every topology-level check.
pub fn validate_topology(topology: &Topology) -> Diagnostics {
    let mut diags = Diagnostics::new();

    check_duplicate_ids(topology, &mut diags);
    check_edge_endpoints(topology, &mut diags);
    check_storey_references(topology, &mut diags);
    check_containment_cycles(topology, &mut diags);
    check_optional_attributes(topology, &mut diags);

    if diags.has_errors() {
        tracing::warn!(
            errors = diags.error_count(),
            total = diags.len(),
            "topology validation failed"
        );
    }
    diags
}

fn check_duplicate_ids(topology: &Topology, diags: &mut Diagnostics) {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for sp in topology.spaces() {
        if !seen.insert(&sp.id) {
            diags.error(
                "topology.duplicate_space",
                "duplicate space id",
                vec![sp.id.clone()],
            );
        }
    }
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for st in topology.storeys() {
        if !seen.insert(&st.id) {
            diags.error(
                "topology.duplicate_storey",
                "duplicate storey id",
                vec![st.id.clone()],
            );
        }
    }
}

fn check_edge_endpoints(topology: &Topology, diags: &mut Diagnostics) {
    let pairs = topology
        .adjacency_pairs()
        .iter()
        .chain(topology.connected_pairs());
    for (a, b) in pairs {
        for endpoint in [a, b] {
            if topology.space(endpoint).is_none() {
                diags.error(
                    "topology.unknown_edge_endpoint",
                    "edge endpoint refers to an unknown space id",
                    vec![endpoint.clone()],
                );
            }
        }
    }
}

fn check_storey_references(topology: &Topology, diags: &mut Diagnostics) {
    for sp in topology.spaces() {
        let storey_ref = sp.storey_ref();
        if storey_ref != DEFAULT_STOREY_ID && topology.storey(storey_ref).is_none() {
            diags.error(
                "topology.unknown_storey",
                "space references an unknown storey id",
                vec![sp.id.clone(), storey_ref.to_string()],
            );
        }
    }
}

/// Containment must stay hierarchical: a storey contained (transitively)
/// inside one of its own spaces is a cycle.
fn check_containment_cycles(topology: &Topology, diags: &mut Diagnostics) {
    // contained → containers
    let mut parents: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for (contained, container) in topology.containments() {
        parents.entry(contained).or_default().push(container);
    }

    let storey_ids: FxHashSet<&str> = topology.storeys().iter().map(|s| s.id.as_str()).collect();
    let space_ids: FxHashSet<&str> = topology.spaces().iter().map(|s| s.id.as_str()).collect();

    // A storey directly contained in a space is already inconsistent.
    for (contained, container) in topology.containments() {
        if storey_ids.contains(contained.as_str()) && space_ids.contains(container.as_str()) {
            diags.error(
                "topology.cyclic_containment",
                "storey is contained within a space",
                vec![contained.clone(), container.clone()],
            );
        }
    }

    // General cycle detection: a node transitively contained in itself.
    // Duplicate assertions of the same containment (two vocabularies) are
    // legal and must not trip this.
    let mut starts: Vec<&str> = parents.keys().copied().collect();
    starts.sort_unstable();
    for start in starts {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut stack: Vec<&str> = parents
            .get(start)
            .map(|ps| ps.to_vec())
            .unwrap_or_default();
        while let Some(node) = stack.pop() {
            if node == start {
                diags.error(
                    "topology.cyclic_containment",
                    "containment relation forms a cycle",
                    vec![start.to_string()],
                );
                break;
            }
            if visited.insert(node) {
                if let Some(ps) = parents.get(node) {
                    stack.extend(ps.iter().copied());
                }
            }
        }
    }
}

fn check_optional_attributes(topology: &Topology, diags: &mut Diagnostics) {
    for sp in topology.spaces() {
        if sp.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            diags.warn(
                "topology.missing_name",
                "space has no name; the id will be used downstream",
                vec![sp.id.clone()],
            );
        }
        if sp.target_area.is_none() {
            diags.warn(
                "topology.missing_area_target",
                "space has no target area; the configured default applies",
                vec![sp.id.clone()],
            );
        }
    }
}
