// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the pipeline.
//!
//! Only the fail-fast kinds live here. Recoverable conditions (layout
//! violations, degenerate geometry) are reported through
//! [`crate::diagnostics::Diagnostics`] instead of aborting the pipeline.

use crate::diagnostics::Diagnostics;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unparseable RDF input or missing required triples.
    #[error("invalid input: {0}")]
    InputInvalid(String),

    /// The topology validator reported ERROR-severity diagnostics.
    #[error("inconsistent topology: {} error diagnostic(s)", .0.error_count())]
    TopologyInconsistent(Diagnostics),

    /// The CP solver produced no placement within its budget. Recovered by
    /// the heuristic fallback; surfaces only when the caller opts out.
    #[error("no feasible layout: {0}")]
    LayoutInfeasible(String),

    /// The downstream IFC writer rejected the model.
    #[error("IFC export failed: {0}")]
    ExportFailure(String),
}
