// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Neutral data model shared by every pipeline stage.
//!
//! All records here are created once per pipeline invocation, consumed once,
//! then discarded. Spaces and storeys are immutable after extraction; the
//! layout solver produces a separate placement record (`LayoutRect`) keyed
//! by space id rather than mutating the space.

use serde::{Deserialize, Serialize};

/// Coordinate-equality epsilon for all geometric comparisons (metres).
pub const COORD_EPS: f64 = 1e-3;

/// Minimum length of any emitted segment (metres). Walls and shared
/// boundaries shorter than this are degenerate.
pub const MIN_SEGMENT_LEN: f64 = 0.05;

/// Storey id assigned to spaces with no containment triple.
pub const DEFAULT_STOREY_ID: &str = "__default__";

/// A 2D point (simplified for serialization).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Coordinate-wise equality within [`COORD_EPS`].
    pub fn coincides(&self, other: &Point2D) -> bool {
        (self.x - other.x).abs() <= COORD_EPS && (self.y - other.y).abs() <= COORD_EPS
    }
}

/// A horizontal building level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Storey {
    /// Unique identifier (typically the RDF subject IRI).
    pub id: String,
    /// Human-readable name, when the graph provides one.
    pub name: Option<String>,
    /// Base elevation in metres.
    pub elevation: f64,
    /// Ordering index, assigned after an elevation-ascending sort.
    pub index: u32,
}

/// A room-like region to be placed on a storey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    /// Unique identifier (typically the RDF subject IRI).
    pub id: String,
    pub name: Option<String>,
    /// Free-form category tag (office, corridor, ...).
    pub category: Option<String>,
    /// Target floor area in m².
    pub target_area: Option<f64>,
    /// Minimum floor area in m².
    pub min_area: Option<f64>,
    /// Ceiling height in metres, overriding the configured default.
    pub ceiling_height: Option<f64>,
    /// Lower bound on width/height aspect ratio.
    pub aspect_ratio_min: Option<f64>,
    /// Upper bound on width/height aspect ratio.
    pub aspect_ratio_max: Option<f64>,
    /// Containing storey. The extractor resolves this to
    /// [`DEFAULT_STOREY_ID`] when the graph has no containment triple.
    pub storey_id: Option<String>,
}

impl Space {
    /// Storey reference, falling back to the synthetic default storey.
    pub fn storey_ref(&self) -> &str {
        self.storey_id.as_deref().unwrap_or(DEFAULT_STOREY_ID)
    }

    /// Target area with the configured default applied.
    pub fn effective_target_area(&self, default_target_area: f64) -> f64 {
        self.target_area.unwrap_or(default_target_area)
    }

    /// Area floor: the explicit minimum when given, otherwise the square of
    /// the minimum side length. The minimum side always wins over a smaller
    /// target area.
    pub fn effective_min_area(&self, min_side_length: f64) -> f64 {
        self.min_area
            .unwrap_or(min_side_length * min_side_length)
            .max(min_side_length * min_side_length)
    }
}

/// Kind of an undirected space-to-space edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Spaces share a wall.
    Adjacency,
    /// A door-like opening exists; implies adjacency.
    Connection,
}

/// An undirected edge between two spaces. Endpoints are stored in
/// lexicographic order so unordered duplicates coalesce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub a: String,
    pub b: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(a: impl Into<String>, b: impl Into<String>, kind: EdgeKind) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { a, b, kind }
        } else {
            Self { a: b, b: a, kind }
        }
    }
}

/// Axis-aligned rectangle assigned to a space by the layout solver.
///
/// Coordinates are metres; width and height are strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub space_id: String,
    pub storey_id: String,
    /// Lower-left corner.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    pub fn new(
        space_id: impl Into<String>,
        storey_id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            space_id: space_id.into(),
            storey_id: storey_id.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn x2(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge.
    pub fn y2(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Interior intersection area with another rectangle (0 when they only
    /// share an edge).
    pub fn intersection_area(&self, other: &LayoutRect) -> f64 {
        let w = self.x2().min(other.x2()) - self.x.max(other.x);
        let h = self.y2().min(other.y2()) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    /// Length of the boundary segment shared with another rectangle, or 0
    /// when the rectangles do not abut. Coordinates are compared within
    /// [`COORD_EPS`]; corner touches count as 0.
    pub fn shared_edge_length(&self, other: &LayoutRect) -> f64 {
        let x_touch = (self.x2() - other.x).abs() <= COORD_EPS
            || (other.x2() - self.x).abs() <= COORD_EPS;
        let y_overlap = self.y2().min(other.y2()) - self.y.max(other.y);
        if x_touch && y_overlap > COORD_EPS {
            return y_overlap;
        }

        let y_touch = (self.y2() - other.y).abs() <= COORD_EPS
            || (other.y2() - self.y).abs() <= COORD_EPS;
        let x_overlap = self.x2().min(other.x2()) - self.x.max(other.x);
        if y_touch && x_overlap > COORD_EPS {
            return x_overlap;
        }
        0.0
    }
}

/// Wall classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    /// Part of the storey's outer envelope.
    Exterior,
    /// Partition between two spaces.
    Interior,
}

/// A straight wall segment in storey-local plan coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub storey_id: String,
    pub start: Point2D,
    pub end: Point2D,
    /// Wall thickness in metres.
    pub thickness: f64,
    /// Wall height in metres.
    pub height: f64,
    pub kind: WallKind,
}

impl WallSegment {
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn midpoint(&self) -> Point2D {
        Point2D::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Unit direction from start to end; falls back to +X for degenerate
    /// segments so callers never divide by zero.
    pub fn direction(&self) -> (f64, f64) {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len = self.length();
        if len > 1e-9 {
            (dx / len, dy / len)
        } else {
            (1.0, 0.0)
        }
    }
}

/// Floor polygon for one connected component of a storey's footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabPolygon {
    pub storey_id: String,
    /// Ordered outer ring, at least 3 vertices, not closed (the last vertex
    /// does not repeat the first).
    pub ring: Vec<Point2D>,
    /// Slab thickness in metres.
    pub thickness: f64,
    /// Equal to the storey elevation.
    pub elevation: f64,
}

impl SlabPolygon {
    /// Shoelace area of the ring (absolute value).
    pub fn area(&self) -> f64 {
        ring_area(&self.ring)
    }
}

/// Upper polygon mirroring a storey's slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roof {
    pub storey_id: String,
    pub ring: Vec<Point2D>,
    /// Storey elevation plus ceiling height.
    pub elevation: f64,
}

impl Roof {
    pub fn area(&self) -> f64 {
        ring_area(&self.ring)
    }
}

/// Axis of the shared boundary a door sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorOrientation {
    /// Shared boundary runs along the X axis; the door passes through a
    /// horizontal wall.
    Horizontal,
    /// Shared boundary runs along the Y axis.
    Vertical,
}

/// A door opening on the shared boundary of two connected spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorOpening {
    pub space_a: String,
    pub space_b: String,
    pub storey_id: String,
    /// Midpoint of the shared boundary segment.
    pub position: Point2D,
    pub orientation: DoorOrientation,
    pub width: f64,
    pub height: f64,
}

fn ring_area(ring: &[Point2D]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].x * ring[j].y;
        area -= ring[j].x * ring[i].y;
    }
    (area / 2.0).abs()
}
