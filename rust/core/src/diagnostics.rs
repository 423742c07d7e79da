// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured diagnostics carried alongside stage results.
//!
//! The pipeline never reports problems as bare log lines: every suppression
//! or recovery produces a [`Diagnostic`] that ends up in the constraints
//! report. Callers decide whether warnings are fatal; the pipeline itself
//! aborts only on [`Severity::Error`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One structured finding, identified by a stable dot-separated code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine-readable code, e.g. `topology.unknown_edge_endpoint`.
    pub code: String,
    pub severity: Severity,
    pub message: String,
    /// Ids of the entities the finding refers to.
    pub refs: Vec<String>,
}

/// Ordered collection of diagnostics produced by one stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        refs: Vec<String>,
    ) {
        self.entries.push(Diagnostic {
            code: code.into(),
            severity: Severity::Warning,
            message: message.into(),
            refs,
        });
    }

    pub fn error(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        refs: Vec<String>,
    ) {
        self.entries.push(Diagnostic {
            code: code.into(),
            severity: Severity::Error,
            message: message.into(),
            refs,
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, d) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{:?}] {}: {}", d.severity, d.code, d.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detection() {
        let mut diags = Diagnostics::new();
        diags.warn("x.w", "just a warning", vec![]);
        assert!(!diags.has_errors());
        diags.error("x.e", "a real problem", vec!["id1".into()]);
        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn serializes_with_stable_fields() {
        let mut diags = Diagnostics::new();
        diags.warn("a.b", "msg", vec!["r".into()]);
        let json = serde_json::to_string(&diags).unwrap();
        assert!(json.contains("\"code\":\"a.b\""));
        assert!(json.contains("\"severity\":\"warning\""));
    }
}
