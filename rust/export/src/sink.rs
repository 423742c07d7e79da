// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The writer-side interface.
//!
//! [`IfcSink`] is the only surface through which the pipeline talks to an
//! IFC library: the real implementation lives downstream and owns entity
//! creation and serialization. [`RecordingSink`] captures the call
//! sequence for tests.

use graphbim_core::{DoorOpening, LayoutRect, Roof, SlabPolygon, Space, Storey, WallSegment};

/// Error raised by a writer implementation.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SinkError(pub String);

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Receives the building model element by element, grouped under the
/// storey named by each element. Calls arrive in a fixed order: all
/// storeys first (sorted by elevation), then spaces, slabs, roofs, walls
/// and doors, each grouped by storey; `finish` is always last.
pub trait IfcSink {
    fn storey(&mut self, storey: &Storey) -> Result<(), SinkError>;
    /// `rect` is in storey-local coordinates.
    fn space(&mut self, space: &Space, rect: &LayoutRect) -> Result<(), SinkError>;
    fn slab(&mut self, slab: &SlabPolygon) -> Result<(), SinkError>;
    fn roof(&mut self, roof: &Roof) -> Result<(), SinkError>;
    fn wall(&mut self, wall: &WallSegment) -> Result<(), SinkError>;
    fn door(&mut self, door: &DoorOpening) -> Result<(), SinkError>;
    fn finish(&mut self) -> Result<(), SinkError>;
}

/// One recorded sink call, for asserting hand-off order in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    Storey(String),
    Space(String),
    Slab(String),
    Roof(String),
    Wall(String),
    Door(String, String),
    Finish,
}

/// Sink that records every call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<ExportEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IfcSink for RecordingSink {
    fn storey(&mut self, storey: &Storey) -> Result<(), SinkError> {
        self.events.push(ExportEvent::Storey(storey.id.clone()));
        Ok(())
    }

    fn space(&mut self, space: &Space, _rect: &LayoutRect) -> Result<(), SinkError> {
        self.events.push(ExportEvent::Space(space.id.clone()));
        Ok(())
    }

    fn slab(&mut self, slab: &SlabPolygon) -> Result<(), SinkError> {
        self.events.push(ExportEvent::Slab(slab.storey_id.clone()));
        Ok(())
    }

    fn roof(&mut self, roof: &Roof) -> Result<(), SinkError> {
        self.events.push(ExportEvent::Roof(roof.storey_id.clone()));
        Ok(())
    }

    fn wall(&mut self, wall: &WallSegment) -> Result<(), SinkError> {
        self.events.push(ExportEvent::Wall(wall.storey_id.clone()));
        Ok(())
    }

    fn door(&mut self, door: &DoorOpening) -> Result<(), SinkError> {
        self.events
            .push(ExportEvent::Door(door.space_a.clone(), door.space_b.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.events.push(ExportEvent::Finish);
        Ok(())
    }
}
