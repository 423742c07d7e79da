// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # graphbim Core
//!
//! Neutral data model, configuration and diagnostics shared by every stage
//! of the graphbim pipeline (RDF topology → layout solver → parametric
//! geometry → IFC hand-off).
//!
//! This crate deliberately has no geometry, no solver, and no I/O: it is
//! the vocabulary the other crates speak to each other.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;

pub use config::{Config, SolverKind};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use model::{
    DoorOpening, DoorOrientation, Edge, EdgeKind, LayoutRect, Point2D, Roof, SlabPolygon, Space,
    Storey, WallKind, WallSegment, COORD_EPS, DEFAULT_STOREY_ID, MIN_SEGMENT_LEN,
};
