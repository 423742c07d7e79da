// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # graphbim Export
//!
//! Hands the assembled building model to an external IFC writer in a
//! fixed, deterministic order: storeys sorted by elevation, then spaces
//! (grouped by storey, in storey-local coordinates), slabs, roofs, walls
//! and doors. This crate depends on nothing upstream beyond the neutral
//! data model; the writer itself stays behind the [`IfcSink`] trait.

pub mod model;
pub mod sink;

pub use model::{BuildingModel, SpacePlacement, StoreyBatch};
pub use sink::{ExportEvent, IfcSink, RecordingSink, SinkError};

use graphbim_core::{Error, Result};

/// Drive the sink through the whole model. Any sink failure maps to
/// [`Error::ExportFailure`] and aborts the hand-off.
pub fn export_model(model: &BuildingModel, sink: &mut dyn IfcSink) -> Result<()> {
    let fail = |e: SinkError| Error::ExportFailure(e.to_string());

    for batch in &model.batches {
        sink.storey(&batch.storey).map_err(fail)?;
    }
    for batch in &model.batches {
        for placement in &batch.spaces {
            sink.space(&placement.space, &placement.rect).map_err(fail)?;
        }
    }
    for batch in &model.batches {
        for slab in &batch.slabs {
            sink.slab(slab).map_err(fail)?;
        }
    }
    for batch in &model.batches {
        for roof in &batch.roofs {
            sink.roof(roof).map_err(fail)?;
        }
    }
    for batch in &model.batches {
        for wall in &batch.walls {
            sink.wall(wall).map_err(fail)?;
        }
    }
    for batch in &model.batches {
        for door in &batch.doors {
            sink.door(door).map_err(fail)?;
        }
    }
    sink.finish().map_err(fail)?;

    tracing::debug!(storeys = model.batches.len(), "export hand-off complete");
    Ok(())
}
