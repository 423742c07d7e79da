// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory triple store interface.
//!
//! RDF parsing is an upstream concern; the extractor only needs a parsed
//! store it can query by type and predicate. Insertion order is preserved
//! so every query is deterministic for a fixed input.

use rustc_hash::FxHashMap;

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    /// A resource reference.
    Iri(String),
    /// A literal value, kept as its lexical form.
    Literal(String),
}

impl Object {
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Object::Iri(iri) => Some(iri),
            Object::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Object::Literal(lit) => Some(lit),
            Object::Iri(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
}

/// A parsed RDF graph with predicate and subject indices.
#[derive(Debug, Default)]
pub struct TripleStore {
    triples: Vec<Triple>,
    /// predicate → triple indices, in insertion order.
    by_predicate: FxHashMap<String, Vec<usize>>,
    /// subject → triple indices, in insertion order.
    by_subject: FxHashMap<String, Vec<usize>>,
}

impl TripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: Object,
    ) {
        let triple = Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        };
        let idx = self.triples.len();
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .push(idx);
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(idx);
        self.triples.push(triple);
    }

    /// Convenience for `(s, p, <iri>)`.
    pub fn insert_iri(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) {
        self.insert(subject, predicate, Object::Iri(object.into()));
    }

    /// Convenience for `(s, p, "literal")`.
    pub fn insert_literal(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) {
        self.insert(subject, predicate, Object::Literal(object.into()));
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Subjects typed as `class` via the given type predicate, in insertion
    /// order.
    pub fn subjects_of_type<'a>(&'a self, type_predicate: &str, class: &str) -> Vec<&'a str> {
        let mut out = Vec::new();
        if let Some(indices) = self.by_predicate.get(type_predicate) {
            for &i in indices {
                let t = &self.triples[i];
                if t.object.as_iri() == Some(class) {
                    out.push(t.subject.as_str());
                }
            }
        }
        out
    }

    /// All `(subject, object-iri)` pairs for a predicate, in insertion order.
    pub fn iri_pairs<'a>(&'a self, predicate: &str) -> Vec<(&'a str, &'a str)> {
        let mut out = Vec::new();
        if let Some(indices) = self.by_predicate.get(predicate) {
            for &i in indices {
                let t = &self.triples[i];
                if let Some(obj) = t.object.as_iri() {
                    out.push((t.subject.as_str(), obj));
                }
            }
        }
        out
    }

    /// First object IRI for `(subject, predicate, ?)`.
    pub fn first_iri<'a>(&'a self, subject: &str, predicate: &str) -> Option<&'a str> {
        let indices = self.by_subject.get(subject)?;
        indices
            .iter()
            .map(|&i| &self.triples[i])
            .find(|t| t.predicate == predicate && t.object.as_iri().is_some())
            .and_then(|t| t.object.as_iri())
    }

    /// First literal found across a list of candidate predicates, checked
    /// in the order given (so registry ordering decides vocabulary
    /// precedence).
    pub fn first_literal<'a, S: AsRef<str>>(
        &'a self,
        subject: &str,
        predicates: &[S],
    ) -> Option<&'a str> {
        let indices = self.by_subject.get(subject)?;
        for pred in predicates {
            for &i in indices {
                let t = &self.triples[i];
                if t.predicate == pred.as_ref() {
                    if let Some(lit) = t.object.as_literal() {
                        return Some(lit);
                    }
                }
            }
        }
        None
    }

    /// First literal parsed as `f64` across candidate predicates.
    /// Unparsable literals are skipped, not errors.
    pub fn first_float<S: AsRef<str>>(&self, subject: &str, predicates: &[S]) -> Option<f64> {
        let indices = self.by_subject.get(subject)?;
        for pred in predicates {
            for &i in indices {
                let t = &self.triples[i];
                if t.predicate == pred.as_ref() {
                    if let Some(lit) = t.object.as_literal() {
                        if let Ok(v) = lit.trim().parse::<f64>() {
                            return Some(v);
                        }
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    #[test]
    fn subjects_of_type_preserves_insertion_order() {
        let mut store = TripleStore::new();
        store.insert_iri("b", TYPE, "ex#Space");
        store.insert_iri("a", TYPE, "ex#Space");
        store.insert_iri("c", TYPE, "ex#Other");
        assert_eq!(store.subjects_of_type(TYPE, "ex#Space"), vec!["b", "a"]);
    }

    #[test]
    fn first_literal_respects_predicate_precedence() {
        let mut store = TripleStore::new();
        store.insert_literal("s", "ex#fallbackName", "Fallback");
        store.insert_literal("s", "ex#name", "Primary");
        let got = store.first_literal("s", &["ex#name", "ex#fallbackName"]);
        assert_eq!(got, Some("Primary"));
    }

    #[test]
    fn first_float_skips_unparsable() {
        let mut store = TripleStore::new();
        store.insert_literal("s", "ex#area", "not-a-number");
        store.insert_literal("s", "ex#area", "16.5");
        assert_eq!(store.first_float("s", &["ex#area"]), Some(16.5));
    }

    #[test]
    fn literals_never_match_iri_queries() {
        let mut store = TripleStore::new();
        store.insert_literal("s", "ex#onStorey", "L1");
        assert_eq!(store.first_iri("s", "ex#onStorey"), None);
        assert!(store.iri_pairs("ex#onStorey").is_empty());
    }
}
