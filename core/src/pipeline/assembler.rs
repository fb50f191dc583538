use crate::geo::BoundingBox;
use crate::mission::document::{MISSION_CREATOR, MISSION_NAME};
use crate::mission::{
    CollectionKind, Feature, MissionDocument, MissionMetadata, MissionParameters, Waypoint,
};
use crate::prelude::{RunResult, Stage};
use crate::telemetry::log::LogManager;

/// Wraps the ordered waypoints into a GeoJSON `FeatureCollection`.
pub struct MissionAssembler {
    params: MissionParameters,
    rejected_count: usize,
    logger: LogManager,
}

impl MissionAssembler {
    pub fn new(params: MissionParameters, rejected_count: usize) -> Self {
        Self {
            params,
            rejected_count,
            logger: LogManager::new("assembler"),
        }
    }
}

impl Stage<Vec<Waypoint>> for MissionAssembler {
    type Output = MissionDocument;

    fn name(&self) -> &'static str {
        "assembler"
    }

    fn execute(&self, input: Vec<Waypoint>) -> RunResult<Self::Output> {
        let bbox = BoundingBox::covering(
            input
                .iter()
                .map(|w| (w.position.longitude, w.position.latitude)),
        )
        .map(BoundingBox::to_array);
        let features: Vec<Feature> = input.iter().map(Feature::from).collect();

        self.logger.record(&format!(
            "assembled mission with {} waypoints ({} records rejected)",
            features.len(),
            self.rejected_count
        ));

        Ok(MissionDocument {
            kind: CollectionKind::FeatureCollection,
            metadata: MissionMetadata {
                name: MISSION_NAME.to_string(),
                creator: MISSION_CREATOR.to_string(),
                altitude_m: self.params.altitude_m,
                hover_time_s: self.params.hover_time_s,
                waypoint_count: features.len(),
                rejected_count: self.rejected_count,
            },
            bbox,
            features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::{Geometry, GeometryKind, PointMetadata, Position};

    fn waypoint(sequence_number: usize, longitude: f64, latitude: f64) -> Waypoint {
        Waypoint {
            sequence_number,
            position: Position {
                longitude,
                latitude,
            },
            altitude_m: 60.0,
            hover_time_s: 120.0,
            description: format!("Patrol target at input index {}.", sequence_number - 1),
            source_index: sequence_number - 1,
            metadata: PointMetadata::default(),
        }
    }

    #[test]
    fn empty_mission_is_well_formed() {
        let document = MissionAssembler::new(MissionParameters::default(), 3)
            .execute(Vec::<Waypoint>::new())
            .unwrap();

        assert!(document.is_empty());
        assert_eq!(document.bbox, None);
        assert_eq!(document.metadata.rejected_count, 3);

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"], serde_json::json!([]));
        assert!(value.get("bbox").is_none());
    }

    #[test]
    fn features_follow_waypoint_order() {
        let document = MissionAssembler::new(MissionParameters::default(), 0)
            .execute(vec![waypoint(1, 138.6, -34.9), waypoint(2, 138.7, -35.0)])
            .unwrap();

        let sequence: Vec<usize> = document
            .features
            .iter()
            .map(|f| f.properties.sequence_number)
            .collect();
        assert_eq!(sequence, vec![1, 2]);
        assert_eq!(
            document.features[1].geometry,
            Geometry {
                kind: GeometryKind::Point,
                coordinates: [138.7, -35.0]
            }
        );
        assert_eq!(document.bbox, Some([138.6, -35.0, 138.7, -34.9]));
        assert_eq!(document.metadata.waypoint_count, 2);
        assert_eq!(document.metadata.altitude_m, 60.0);
    }
}
