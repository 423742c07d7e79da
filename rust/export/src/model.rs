// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The assembled building model handed to the IFC writer.
//!
//! Everything is grouped by storey and sorted deterministically. Space
//! rectangles are expected in storey-local coordinates (the layout
//! post-processor re-origins each storey); the adapter never translates
//! them again.

use graphbim_core::{DoorOpening, LayoutRect, Roof, SlabPolygon, Space, Storey, WallSegment};

/// A space together with its placed rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacePlacement {
    pub space: Space,
    pub rect: LayoutRect,
}

/// Everything that belongs to one storey, each list internally sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreyBatch {
    pub storey: Storey,
    pub spaces: Vec<SpacePlacement>,
    pub slabs: Vec<SlabPolygon>,
    pub roofs: Vec<Roof>,
    pub walls: Vec<WallSegment>,
    pub doors: Vec<DoorOpening>,
}

/// The complete model, storeys sorted by elevation (then id).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingModel {
    pub batches: Vec<StoreyBatch>,
}

impl BuildingModel {
    /// Group loose pipeline outputs into per-storey batches with
    /// deterministic ordering. Spaces without a rectangle are skipped; the
    /// layout validator has already reported them.
    pub fn from_parts(
        storeys: Vec<Storey>,
        spaces: Vec<Space>,
        rects: Vec<LayoutRect>,
        walls: Vec<WallSegment>,
        slabs: Vec<SlabPolygon>,
        roofs: Vec<Roof>,
        doors: Vec<DoorOpening>,
    ) -> Self {
        let mut sorted_storeys = storeys;
        sorted_storeys.sort_by(|a, b| {
            a.elevation
                .partial_cmp(&b.elevation)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        let batches = sorted_storeys
            .into_iter()
            .map(|storey| {
                let mut placements: Vec<SpacePlacement> = spaces
                    .iter()
                    .filter(|sp| sp.storey_ref() == storey.id)
                    .filter_map(|sp| {
                        rects
                            .iter()
                            .find(|r| r.space_id == sp.id && r.storey_id == storey.id)
                            .map(|r| SpacePlacement {
                                space: sp.clone(),
                                rect: r.clone(),
                            })
                    })
                    .collect();
                placements.sort_by(|a, b| a.space.id.cmp(&b.space.id));

                let mut batch_walls: Vec<WallSegment> = walls
                    .iter()
                    .filter(|w| w.storey_id == storey.id)
                    .cloned()
                    .collect();
                batch_walls.sort_by(|a, b| {
                    (a.kind as u8, quant(a.start.x), quant(a.start.y), quant(a.end.x))
                        .cmp(&(b.kind as u8, quant(b.start.x), quant(b.start.y), quant(b.end.x)))
                });

                let batch_slabs: Vec<SlabPolygon> = slabs
                    .iter()
                    .filter(|s| s.storey_id == storey.id)
                    .cloned()
                    .collect();
                let batch_roofs: Vec<Roof> = roofs
                    .iter()
                    .filter(|r| r.storey_id == storey.id)
                    .cloned()
                    .collect();

                let mut batch_doors: Vec<DoorOpening> = doors
                    .iter()
                    .filter(|d| d.storey_id == storey.id)
                    .cloned()
                    .collect();
                batch_doors.sort_by(|a, b| {
                    (&a.space_a, &a.space_b).cmp(&(&b.space_a, &b.space_b))
                });

                StoreyBatch {
                    storey,
                    spaces: placements,
                    slabs: batch_slabs,
                    roofs: batch_roofs,
                    walls: batch_walls,
                    doors: batch_doors,
                }
            })
            .collect();

        Self { batches }
    }

    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(|b| b.spaces.is_empty())
    }
}

fn quant(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}
