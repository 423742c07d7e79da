// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # graphbim Topology
//!
//! Topology extraction and validation: maps a multi-vocabulary RDF graph
//! (BOT, Brick, SBCO, internal) onto a single internal topology of
//! storeys, spaces and undirected adjacency/connection edges.
//!
//! RDF parsing itself stays upstream; this crate consumes a parsed
//! [`store::TripleStore`].

pub mod extract;
pub mod graph;
pub mod store;
pub mod validate;
pub mod vocabulary;

pub use extract::{extract_topology, Extraction};
pub use graph::Topology;
pub use store::{Object, Triple, TripleStore};
pub use validate::validate_topology;
pub use vocabulary::{Vocabulary, RDF_TYPE};
