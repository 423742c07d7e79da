// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optional debug artifacts: the layout JSON, the constraints report and a
//! GeoJSON rendering of the rectangle footprints.
//!
//! The layout schema is stable and round-trips byte-identically modulo key
//! order: `{storeys:[{id,elevation,rects:[{space_id,x,y,w,h}]}]}`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use graphbim_core::{LayoutRect, Storey};

use crate::report::LayoutReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectDump {
    pub space_id: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreyDump {
    pub id: String,
    pub elevation: f64,
    pub rects: Vec<RectDump>,
}

/// Serializable snapshot of a solved layout, grouped by storey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDump {
    pub storeys: Vec<StoreyDump>,
}

impl LayoutDump {
    /// Build a dump with deterministic ordering: storeys by elevation
    /// (then id), rectangles by space id.
    pub fn new(rects: &[LayoutRect], storeys: &[Storey]) -> Self {
        let mut sorted: Vec<&Storey> = storeys.iter().collect();
        sorted.sort_by(|a, b| {
            a.elevation
                .partial_cmp(&b.elevation)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        let storeys = sorted
            .into_iter()
            .map(|st| {
                let mut on_storey: Vec<RectDump> = rects
                    .iter()
                    .filter(|r| r.storey_id == st.id)
                    .map(|r| RectDump {
                        space_id: r.space_id.clone(),
                        x: r.x,
                        y: r.y,
                        w: r.width,
                        h: r.height,
                    })
                    .collect();
                on_storey.sort_by(|a, b| a.space_id.cmp(&b.space_id));
                StoreyDump {
                    id: st.id.clone(),
                    elevation: st.elevation,
                    rects: on_storey,
                }
            })
            .collect();
        Self { storeys }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("layout dump serializes")
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

pub fn write_layout_json(dump: &LayoutDump, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, dump.to_json())?;
    tracing::debug!(path = %path.display(), "layout json written");
    Ok(())
}

pub fn write_report_json(report: &LayoutReport, path: &Path) -> std::io::Result<()> {
    let text = serde_json::to_string_pretty(report).expect("report serializes");
    std::fs::write(path, text)?;
    tracing::debug!(path = %path.display(), "constraints report written");
    Ok(())
}

/// GeoJSON FeatureCollection of rectangle footprints, for quick visual
/// inspection in any GIS viewer.
pub fn write_layout_geojson(rects: &[LayoutRect], path: &Path) -> std::io::Result<()> {
    let features: Vec<serde_json::Value> = rects
        .iter()
        .map(|r| {
            json!({
                "type": "Feature",
                "properties": {
                    "space_id": r.space_id,
                    "storey_id": r.storey_id,
                    "area": (r.area() * 1000.0).round() / 1000.0,
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [r.x, r.y],
                        [r.x2(), r.y],
                        [r.x2(), r.y2()],
                        [r.x, r.y2()],
                        [r.x, r.y],
                    ]],
                },
            })
        })
        .collect();
    let fc = json!({ "type": "FeatureCollection", "features": features });
    std::fs::write(path, serde_json::to_string_pretty(&fc).expect("geojson serializes"))?;
    tracing::debug!(path = %path.display(), features = rects.len(), "layout geojson written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<LayoutRect>, Vec<Storey>) {
        let rects = vec![
            LayoutRect::new("b", "L1", 4.0, 0.0, 4.0, 4.0),
            LayoutRect::new("a", "L1", 0.0, 0.0, 4.0, 4.0),
            LayoutRect::new("c", "L2", 0.0, 0.0, 3.0, 3.0),
        ];
        let storeys = vec![
            Storey {
                id: "L2".into(),
                name: None,
                elevation: 3.0,
                index: 1,
            },
            Storey {
                id: "L1".into(),
                name: None,
                elevation: 0.0,
                index: 0,
            },
        ];
        (rects, storeys)
    }

    #[test]
    fn dump_orders_storeys_by_elevation_and_rects_by_id() {
        let (rects, storeys) = sample();
        let dump = LayoutDump::new(&rects, &storeys);
        assert_eq!(dump.storeys[0].id, "L1");
        assert_eq!(dump.storeys[1].id, "L2");
        assert_eq!(dump.storeys[0].rects[0].space_id, "a");
        assert_eq!(dump.storeys[0].rects[1].space_id, "b");
    }

    #[test]
    fn layout_json_round_trips_byte_identically() {
        let (rects, storeys) = sample();
        let dump = LayoutDump::new(&rects, &storeys);
        let first = dump.to_json();
        let reparsed = LayoutDump::from_json(&first).unwrap();
        assert_eq!(reparsed.to_json(), first);
        assert_eq!(reparsed, dump);
    }
}
