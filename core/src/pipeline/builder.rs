use crate::mission::{MissionParameters, Position, ValidatedPoint, Waypoint};
use crate::prelude::{RunResult, Stage};
use crate::telemetry::log::LogManager;
use serde_json::Value;

/// Maps accepted points 1:1 onto waypoints sharing one set of flight parameters.
pub struct WaypointBuilder {
    params: MissionParameters,
    logger: LogManager,
}

impl WaypointBuilder {
    /// `params` are expected to be validated already.
    pub fn new(params: MissionParameters) -> Self {
        Self {
            params,
            logger: LogManager::new("builder"),
        }
    }

    fn build(&self, sequence_number: usize, point: ValidatedPoint) -> Waypoint {
        let description = describe(&point);
        Waypoint {
            sequence_number,
            position: Position {
                longitude: point.longitude,
                latitude: point.latitude,
            },
            altitude_m: self.params.altitude_m,
            hover_time_s: self.params.hover_time_s,
            description,
            source_index: point.index,
            metadata: point.metadata,
        }
    }
}

impl Stage<Vec<ValidatedPoint>> for WaypointBuilder {
    type Output = Vec<Waypoint>;

    fn name(&self) -> &'static str {
        "builder"
    }

    fn execute(&self, input: Vec<ValidatedPoint>) -> RunResult<Self::Output> {
        let waypoints: Vec<Waypoint> = input
            .into_iter()
            .enumerate()
            .map(|(offset, point)| self.build(offset + 1, point))
            .collect();

        self.logger
            .detail(&format!("built {} waypoints", waypoints.len()));
        Ok(waypoints)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Human-readable label from whichever optional fields the record carried.
///
/// Order is fixed: cell, risk type, risk value. A point with no metadata is
/// labelled by its input index instead.
pub fn describe(point: &ValidatedPoint) -> String {
    let metadata = &point.metadata;
    if metadata.is_empty() {
        return format!("Patrol target at input index {}.", point.index);
    }

    let mut parts = vec!["Patrol target.".to_string()];
    if let Some(cell_id) = &metadata.cell_id {
        parts.push(format!("Cell: {}.", render(cell_id)));
    }
    if let Some(risk_type) = &metadata.risk_type {
        parts.push(format!("Risk type: {}.", render(risk_type)));
    }
    if let Some(risk_value) = &metadata.risk_value {
        parts.push(format!("Risk value: {}.", render(risk_value)));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::PointMetadata;
    use serde_json::json;

    fn point(index: usize, metadata: PointMetadata) -> ValidatedPoint {
        ValidatedPoint {
            latitude: -34.9285,
            longitude: 138.6007,
            index,
            metadata,
        }
    }

    #[test]
    fn description_lists_fields_in_fixed_order() {
        let text = describe(&point(
            0,
            PointMetadata {
                cell_id: Some(json!("SA_Grid_001")),
                risk_value: Some(json!(75)),
                risk_type: Some(json!("probability")),
            },
        ));
        assert_eq!(
            text,
            "Patrol target. Cell: SA_Grid_001. Risk type: probability. Risk value: 75."
        );
    }

    #[test]
    fn description_omits_absent_fields() {
        let text = describe(&point(
            0,
            PointMetadata {
                risk_value: Some(json!(0.4)),
                ..Default::default()
            },
        ));
        assert_eq!(text, "Patrol target. Risk value: 0.4.");
    }

    #[test]
    fn description_placeholder_names_index() {
        let text = describe(&point(7, PointMetadata::default()));
        assert_eq!(text, "Patrol target at input index 7.");
    }

    #[test]
    fn builder_numbers_densely_and_swaps_axes() {
        let params = MissionParameters::new(50.0, 10.0).unwrap();
        let waypoints = WaypointBuilder::new(params)
            .execute(vec![
                point(2, PointMetadata::default()),
                point(5, PointMetadata::default()),
            ])
            .unwrap();

        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[0].sequence_number, 1);
        assert_eq!(waypoints[1].sequence_number, 2);
        assert_eq!(waypoints[1].source_index, 5);
        assert_eq!(waypoints[0].position.coordinates(), [138.6007, -34.9285]);
        assert!(waypoints
            .iter()
            .all(|w| w.altitude_m == 50.0 && w.hover_time_s == 10.0));
    }
}
