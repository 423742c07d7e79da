// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RDF vocabulary registry.
//!
//! A read-only table of URI sets grouped by role, covering four
//! vocabularies: BOT (Building Topology Ontology), Brick, SBCO and the
//! internal graphbim namespace. The extractor looks URIs up by exact
//! string match; this module is the single place new vocabularies are
//! added, and no namespace string appears anywhere else.

/// `rdf:type` predicate, the only URI the extractor needs outside the
/// role tables.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

const GBM: &str = "https://graphbim.dev/ont#";
const BOT: &str = "https://w3id.org/bot#";
const BRICK: &str = "https://brickschema.org/schema/Brick#";
const SBCO: &str = "https://w3id.org/sbco#";
const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const SCHEMA: &str = "http://schema.org/";

/// Immutable registry of recognized URI sets, grouped by role.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Classes denoting a room-like space.
    pub space_classes: Vec<String>,
    /// Classes denoting a building storey / level.
    pub storey_classes: Vec<String>,
    /// Classes recognized but ignored by the layout core.
    pub equipment_classes: Vec<String>,
    /// Classes recognized but ignored by the layout core.
    pub point_classes: Vec<String>,
    /// Undirected boundary-sharing properties.
    pub adjacency_properties: Vec<String>,
    /// Undirected door-like connection properties.
    pub connection_properties: Vec<String>,
    /// Containment, `space → storey` direction.
    pub space_in_storey_properties: Vec<String>,
    /// Containment, `storey → space` direction.
    pub storey_has_space_properties: Vec<String>,
    pub name_properties: Vec<String>,
    pub category_properties: Vec<String>,
    pub area_target_properties: Vec<String>,
    pub min_area_properties: Vec<String>,
    pub height_properties: Vec<String>,
    pub aspect_ratio_min_properties: Vec<String>,
    pub aspect_ratio_max_properties: Vec<String>,
    pub elevation_properties: Vec<String>,
}

fn ns(namespace: &str, local: &str) -> String {
    format!("{namespace}{local}")
}

impl Vocabulary {
    /// The standard registry: internal + BOT + Brick + SBCO.
    pub fn standard() -> Self {
        Self {
            space_classes: vec![
                ns(GBM, "Space"),
                ns(BOT, "Space"),
                ns(BRICK, "Space"),
                ns(BRICK, "Room"),
                ns(BRICK, "Area"),
                ns(SBCO, "Space"),
            ],
            storey_classes: vec![
                ns(GBM, "Storey"),
                ns(BOT, "Storey"),
                ns(BRICK, "Floor"),
                ns(SBCO, "Storey"),
                ns(SBCO, "Level"),
            ],
            equipment_classes: vec![
                ns(SBCO, "Equipment"),
                ns(BRICK, "Equipment"),
                ns(BOT, "Element"),
            ],
            point_classes: vec![ns(SBCO, "Point"), ns(BRICK, "Point")],
            adjacency_properties: vec![
                ns(GBM, "adjacentTo"),
                ns(BOT, "adjacentElement"),
                ns(BRICK, "adjacentTo"),
                ns(SBCO, "adjacentTo"),
            ],
            connection_properties: vec![
                ns(GBM, "connectedTo"),
                ns(BOT, "interfaceOf"),
                ns(BRICK, "connectedTo"),
                ns(SBCO, "connectedTo"),
            ],
            space_in_storey_properties: vec![
                ns(GBM, "onStorey"),
                ns(BRICK, "isPartOf"),
                ns(SBCO, "isPartOf"),
            ],
            storey_has_space_properties: vec![
                ns(GBM, "hasSpace"),
                ns(BOT, "hasSpace"),
                ns(BRICK, "hasPart"),
                ns(SBCO, "hasPart"),
            ],
            name_properties: vec![
                ns(GBM, "name"),
                ns(RDFS, "label"),
                ns(SCHEMA, "name"),
                ns(SBCO, "name"),
            ],
            category_properties: vec![ns(GBM, "category"), ns(BRICK, "hasTag")],
            area_target_properties: vec![
                ns(GBM, "areaTarget"),
                ns(GBM, "targetArea"),
                ns(BRICK, "area"),
                ns(SBCO, "targetArea"),
            ],
            min_area_properties: vec![ns(GBM, "areaMin"), ns(GBM, "minArea")],
            height_properties: vec![ns(GBM, "height"), ns(BRICK, "height")],
            aspect_ratio_min_properties: vec![ns(GBM, "aspectRatioMin")],
            aspect_ratio_max_properties: vec![ns(GBM, "aspectRatioMax")],
            elevation_properties: vec![
                ns(GBM, "elevation"),
                ns(BOT, "hasElevation"),
                ns(SBCO, "elevation"),
            ],
        }
    }

    /// The internal namespace, exposed for test fixtures.
    pub fn internal_namespace() -> &'static str {
        GBM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_all_roles() {
        let v = Vocabulary::standard();
        assert!(!v.space_classes.is_empty());
        assert!(!v.storey_classes.is_empty());
        assert!(!v.adjacency_properties.is_empty());
        assert!(!v.connection_properties.is_empty());
        assert!(!v.space_in_storey_properties.is_empty());
        assert!(!v.storey_has_space_properties.is_empty());
        assert!(!v.elevation_properties.is_empty());
    }

    #[test]
    fn bot_space_is_recognized() {
        let v = Vocabulary::standard();
        assert!(v
            .space_classes
            .iter()
            .any(|c| c == "https://w3id.org/bot#Space"));
    }
}
