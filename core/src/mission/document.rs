use super::record::PointMetadata;
use serde::{Deserialize, Serialize};

pub const MISSION_NAME: &str = "Drone Patrol Mission";
pub const MISSION_CREATOR: &str = "Drone Mission Adapter";

/// Output position, longitude first as GeoJSON requires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
}

impl Position {
    pub fn coordinates(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// A single navigable point of the mission.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Dense 1-based order within the mission.
    pub sequence_number: usize,
    pub position: Position,
    pub altitude_m: f64,
    pub hover_time_s: f64,
    pub description: String,
    /// Index of the record in the uploaded list.
    pub source_index: usize,
    pub metadata: PointMetadata,
}

impl Waypoint {
    pub fn name(&self) -> String {
        format!("Waypoint_{}", self.sequence_number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
}

/// Point geometry. A plain struct rather than a tagged enum so numbers are
/// read straight from the parser instead of through serde's buffering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn point(position: Position) -> Self {
        Self {
            kind: GeometryKind::Point,
            coordinates: position.coordinates(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub name: String,
    pub sequence_number: usize,
    pub source_index: usize,
    pub altitude_m: f64,
    pub hover_time_s: f64,
    pub description: String,
    #[serde(flatten)]
    pub metadata: PointMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

impl From<&Waypoint> for Feature {
    fn from(waypoint: &Waypoint) -> Self {
        Self {
            kind: FeatureKind::Feature,
            geometry: Geometry::point(waypoint.position),
            properties: FeatureProperties {
                name: waypoint.name(),
                sequence_number: waypoint.sequence_number,
                source_index: waypoint.source_index,
                altitude_m: waypoint.altitude_m,
                hover_time_s: waypoint.hover_time_s,
                description: waypoint.description.clone(),
                metadata: waypoint.metadata.clone(),
            },
        }
    }
}

/// Mission-level parameters and record counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionMetadata {
    pub name: String,
    pub creator: String,
    pub altitude_m: f64,
    pub hover_time_s: f64,
    pub waypoint_count: usize,
    pub rejected_count: usize,
}

/// The generated GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDocument {
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub metadata: MissionMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
    pub features: Vec<Feature>,
}

impl MissionDocument {
    pub fn waypoint_count(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// `(longitude, latitude)` of every feature in mission order.
    pub fn positions(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.features.iter().map(|feature| {
            let [longitude, latitude] = feature.geometry.coordinates;
            (longitude, latitude)
        })
    }
}
