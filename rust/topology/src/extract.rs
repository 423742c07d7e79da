// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topology extraction from a parsed triple store.
//!
//! Walks the store with the vocabulary registry and yields storeys, spaces
//! and deduplicated undirected edges. Unknown edge endpoints are dropped
//! and reported as warnings; subjects without a recognized type are
//! skipped. Spaces with no containment triple land on a synthetic default
//! storey at elevation 0.

use rustc_hash::{FxHashMap, FxHashSet};

use graphbim_core::{Diagnostics, Space, Storey, DEFAULT_STOREY_ID};

use crate::graph::Topology;
use crate::store::TripleStore;
use crate::vocabulary::{Vocabulary, RDF_TYPE};

/// Extraction result: the topology plus everything worth telling the
/// validator about.
#[derive(Debug)]
pub struct Extraction {
    pub topology: Topology,
    pub diagnostics: Diagnostics,
}

/// Extract the building topology from a parsed RDF store.
pub fn extract_topology(store: &TripleStore, vocab: &Vocabulary) -> Extraction {
    let mut diagnostics = Diagnostics::new();

    let mut storeys = extract_storeys(store, vocab);
    let storey_ids: FxHashSet<String> = storeys.iter().map(|s| s.id.clone()).collect();

    let (mut spaces, containments) = extract_spaces(store, vocab, &storey_ids);

    // Spaces with no containment triple fall back to a synthetic storey.
    let needs_default = spaces.iter().any(|sp| sp.storey_id.is_none());
    if needs_default {
        for sp in spaces.iter_mut().filter(|sp| sp.storey_id.is_none()) {
            sp.storey_id = Some(DEFAULT_STOREY_ID.to_string());
        }
        if !storey_ids.contains(DEFAULT_STOREY_ID) {
            storeys.push(Storey {
                id: DEFAULT_STOREY_ID.to_string(),
                name: None,
                elevation: 0.0,
                index: 0,
            });
        }
    }

    // Ordering index: elevation ascending, id as tie-break.
    storeys.sort_by(|a, b| {
        a.elevation
            .partial_cmp(&b.elevation)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    for (i, st) in storeys.iter_mut().enumerate() {
        st.index = i as u32;
    }

    let known: FxHashSet<String> = spaces.iter().map(|sp| sp.id.clone()).collect();
    let adjacency = extract_edge_pairs(
        store,
        &vocab.adjacency_properties,
        &known,
        "adjacency",
        &mut diagnostics,
    );
    let connections = extract_edge_pairs(
        store,
        &vocab.connection_properties,
        &known,
        "connection",
        &mut diagnostics,
    );

    // Equipment- and point-typed subjects are recognized but ignored here.
    let ignored = count_subjects(store, &vocab.equipment_classes)
        + count_subjects(store, &vocab.point_classes);
    tracing::debug!(
        storeys = storeys.len(),
        spaces = spaces.len(),
        adjacency = adjacency.len(),
        connections = connections.len(),
        ignored_subjects = ignored,
        "extracted topology"
    );

    Extraction {
        topology: Topology::from_parts(storeys, spaces, adjacency, connections, containments),
        diagnostics,
    }
}

fn extract_storeys(store: &TripleStore, vocab: &Vocabulary) -> Vec<Storey> {
    let mut storeys = Vec::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for class in &vocab.storey_classes {
        for subject in store.subjects_of_type(RDF_TYPE, class) {
            if !seen.insert(subject) {
                continue;
            }
            storeys.push(Storey {
                id: subject.to_string(),
                name: store
                    .first_literal(subject, &vocab.name_properties)
                    .map(str::to_string),
                elevation: store
                    .first_float(subject, &vocab.elevation_properties)
                    .unwrap_or(0.0),
                index: 0,
            });
        }
    }
    storeys
}

/// Returns the spaces plus the raw `(contained, container)` assertions the
/// validator needs for its cycle check.
fn extract_spaces(
    store: &TripleStore,
    vocab: &Vocabulary,
    storey_ids: &FxHashSet<String>,
) -> (Vec<Space>, Vec<(String, String)>) {
    // Containment is bidirectional in RDF; collapse both directions into
    // space → storey before building any record.
    let mut containments: Vec<(String, String)> = Vec::new();
    let mut space_to_storey: FxHashMap<String, String> = FxHashMap::default();

    for pred in &vocab.storey_has_space_properties {
        for (container, contained) in store.iri_pairs(pred) {
            containments.push((contained.to_string(), container.to_string()));
            if storey_ids.contains(container) {
                space_to_storey
                    .entry(contained.to_string())
                    .or_insert_with(|| container.to_string());
            }
        }
    }
    for pred in &vocab.space_in_storey_properties {
        for (contained, container) in store.iri_pairs(pred) {
            containments.push((contained.to_string(), container.to_string()));
            space_to_storey
                .entry(contained.to_string())
                .or_insert_with(|| container.to_string());
        }
    }

    let mut spaces = Vec::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for class in &vocab.space_classes {
        for subject in store.subjects_of_type(RDF_TYPE, class) {
            if !seen.insert(subject) {
                continue;
            }
            spaces.push(Space {
                id: subject.to_string(),
                name: store
                    .first_literal(subject, &vocab.name_properties)
                    .map(str::to_string),
                category: store
                    .first_literal(subject, &vocab.category_properties)
                    .map(str::to_string),
                target_area: store.first_float(subject, &vocab.area_target_properties),
                min_area: store.first_float(subject, &vocab.min_area_properties),
                ceiling_height: store.first_float(subject, &vocab.height_properties),
                aspect_ratio_min: store.first_float(subject, &vocab.aspect_ratio_min_properties),
                aspect_ratio_max: store.first_float(subject, &vocab.aspect_ratio_max_properties),
                storey_id: space_to_storey.get(subject).cloned(),
            });
        }
    }
    (spaces, containments)
}

fn extract_edge_pairs(
    store: &TripleStore,
    predicates: &[String],
    known: &FxHashSet<String>,
    kind: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<(String, String)> {
    let mut edges = Vec::new();
    let mut seen: FxHashSet<(String, String)> = FxHashSet::default();

    for pred in predicates {
        for (s, o) in store.iri_pairs(pred) {
            if !known.contains(s) || !known.contains(o) {
                diagnostics.warn(
                    "topology.unknown_edge_endpoint",
                    format!("{kind} edge references an unknown space; edge dropped"),
                    vec![s.to_string(), o.to_string()],
                );
                continue;
            }
            if s == o {
                diagnostics.warn(
                    "topology.self_edge",
                    format!("{kind} edge connects a space to itself; edge dropped"),
                    vec![s.to_string()],
                );
                continue;
            }
            let key = if s < o {
                (s.to_string(), o.to_string())
            } else {
                (o.to_string(), s.to_string())
            };
            if seen.insert(key.clone()) {
                edges.push(key);
            }
        }
    }
    edges
}

fn count_subjects(store: &TripleStore, classes: &[String]) -> usize {
    classes
        .iter()
        .map(|c| store.subjects_of_type(RDF_TYPE, c).len())
        .sum()
}
