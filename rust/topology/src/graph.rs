// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topology graph of spaces, storeys and their edges.
//!
//! Nodes are spaces, undirected edges are adjacency ("shares a wall") or
//! connection ("joined by a door") relationships. The space↔storey
//! relationship is strictly hierarchical here: storeys own a sorted list of
//! spaces and each space carries a storey id value, never a back-reference.

use rustc_hash::{FxHashMap, FxHashSet};

use graphbim_core::{Space, Storey};

/// The extracted building topology.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    storeys: Vec<Storey>,
    spaces: Vec<Space>,
    /// Normalized `(a, b)` with `a < b`, deduplicated.
    adjacency: Vec<(String, String)>,
    /// Normalized `(a, b)` with `a < b`, deduplicated.
    connections: Vec<(String, String)>,
    /// Raw `(contained, container)` assertions, kept for the validator's
    /// cycle check.
    containments: Vec<(String, String)>,
    space_index: FxHashMap<String, usize>,
    storey_index: FxHashMap<String, usize>,
}

impl Topology {
    pub fn from_parts(
        storeys: Vec<Storey>,
        spaces: Vec<Space>,
        adjacency: Vec<(String, String)>,
        connections: Vec<(String, String)>,
        containments: Vec<(String, String)>,
    ) -> Self {
        let mut space_index = FxHashMap::default();
        for (i, sp) in spaces.iter().enumerate() {
            space_index.entry(sp.id.clone()).or_insert(i);
        }
        let mut storey_index = FxHashMap::default();
        for (i, st) in storeys.iter().enumerate() {
            storey_index.entry(st.id.clone()).or_insert(i);
        }
        Self {
            storeys,
            spaces,
            adjacency,
            connections,
            containments,
            space_index,
            storey_index,
        }
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn storeys(&self) -> &[Storey] {
        &self.storeys
    }

    pub fn space(&self, space_id: &str) -> Option<&Space> {
        self.space_index.get(space_id).map(|&i| &self.spaces[i])
    }

    pub fn storey(&self, storey_id: &str) -> Option<&Storey> {
        self.storey_index.get(storey_id).map(|&i| &self.storeys[i])
    }

    pub fn adjacency_pairs(&self) -> &[(String, String)] {
        &self.adjacency
    }

    pub fn connected_pairs(&self) -> &[(String, String)] {
        &self.connections
    }

    pub fn containments(&self) -> &[(String, String)] {
        &self.containments
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// Spaces on a storey, sorted by id for stable downstream iteration.
    pub fn spaces_on_storey(&self, storey_id: &str) -> Vec<&Space> {
        let mut out: Vec<&Space> = self
            .spaces
            .iter()
            .filter(|sp| sp.storey_ref() == storey_id)
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Adjacency neighbors of a space, sorted by id.
    pub fn neighbors(&self, space_id: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for (a, b) in &self.adjacency {
            if a == space_id {
                out.push(b);
            } else if b == space_id {
                out.push(a);
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Number of adjacency edges incident to a space.
    pub fn degree(&self, space_id: &str) -> usize {
        self.adjacency
            .iter()
            .filter(|(a, b)| a == space_id || b == space_id)
            .count()
    }

    /// Connected components over the adjacency relation, largest first
    /// (ties broken by smallest member id). Members are sorted by id.
    pub fn components(&self) -> Vec<Vec<String>> {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut components: Vec<Vec<String>> = Vec::new();

        let mut ids: Vec<&str> = self.spaces.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();

        for &start in &ids {
            if visited.contains(start) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = std::collections::VecDeque::new();
            queue.push_back(start);
            visited.insert(start);
            while let Some(id) = queue.pop_front() {
                component.push(id.to_string());
                for n in self.neighbors(id) {
                    if self.space_index.contains_key(n) && visited.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
            component.sort();
            components.push(component);
        }

        components.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(id: &str, storey: &str) -> Space {
        Space {
            id: id.into(),
            name: Some(id.into()),
            category: None,
            target_area: Some(16.0),
            min_area: None,
            ceiling_height: None,
            aspect_ratio_min: None,
            aspect_ratio_max: None,
            storey_id: Some(storey.into()),
        }
    }

    fn storey(id: &str, elevation: f64) -> Storey {
        Storey {
            id: id.into(),
            name: None,
            elevation,
            index: 0,
        }
    }

    fn chain_topology() -> Topology {
        Topology::from_parts(
            vec![storey("L1", 0.0)],
            vec![space("a", "L1"), space("b", "L1"), space("c", "L1")],
            vec![("a".into(), "b".into()), ("b".into(), "c".into())],
            vec![("a".into(), "b".into())],
            vec![],
        )
    }

    #[test]
    fn neighbors_are_sorted_and_deduplicated() {
        let topo = chain_topology();
        assert_eq!(topo.neighbors("b"), vec!["a", "c"]);
        assert_eq!(topo.neighbors("a"), vec!["b"]);
        assert!(topo.neighbors("zzz").is_empty());
    }

    #[test]
    fn degree_counts_adjacency_only() {
        let topo = chain_topology();
        assert_eq!(topo.degree("b"), 2);
        assert_eq!(topo.degree("c"), 1);
    }

    #[test]
    fn components_over_adjacency() {
        let topo = Topology::from_parts(
            vec![storey("L1", 0.0)],
            vec![
                space("a", "L1"),
                space("b", "L1"),
                space("x", "L1"),
                space("y", "L1"),
                space("lone", "L1"),
            ],
            vec![("a".into(), "b".into()), ("x".into(), "y".into())],
            vec![],
            vec![],
        );
        let comps = topo.components();
        assert_eq!(comps.len(), 3);
        assert_eq!(comps[0], vec!["a".to_string(), "b".to_string()]);
        assert_eq!(comps[1], vec!["x".to_string(), "y".to_string()]);
        assert_eq!(comps[2], vec!["lone".to_string()]);
    }

    #[test]
    fn spaces_on_storey_sorted() {
        let topo = chain_topology();
        let on = topo.spaces_on_storey("L1");
        let ids: Vec<&str> = on.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(topo.spaces_on_storey("L9").is_empty());
    }
}
