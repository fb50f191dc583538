use crate::workflow::config::AdapterConfig;
use anyhow::Context;
use log::warn;
use missioncore::telemetry::{MetricsRecorder, MetricsSnapshot};
use missioncore::{convert, Conversion, MissionDocument, MissionParameters, RunError, RunResult};
use serde::Serialize;
use std::sync::Arc;

/// Drives the conversion core on behalf of the CLI and the HTTP server.
#[derive(Clone)]
pub struct Runner {
    config: AdapterConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: AdapterConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Resolves caller-supplied form values, falling back to configured defaults.
    pub fn parameters(
        &self,
        altitude_m: Option<&str>,
        hover_time_s: Option<&str>,
    ) -> RunResult<MissionParameters> {
        let defaults = self.config.default_parameters();
        MissionParameters::new(
            parse_field("altitude_m", altitude_m, defaults.altitude_m)?,
            parse_field("hover_time_s", hover_time_s, defaults.hover_time_s)?,
        )
    }

    pub fn execute(&self, raw: &[u8], params: &MissionParameters) -> RunResult<Conversion> {
        match convert(raw, params) {
            Ok(conversion) => {
                self.metrics
                    .record_run(conversion.waypoint_count(), conversion.rejections.len());
                Ok(conversion)
            }
            Err(err) => {
                warn!("conversion failed: {}", err);
                self.metrics.record_failure();
                Err(err)
            }
        }
    }
}

fn parse_field(field: &str, raw: Option<&str>, default: f64) -> RunResult<f64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => text.parse::<f64>().map_err(|_| {
            RunError::InvalidMissionParameters(format!("{} must be a number, got {:?}", field, text))
        }),
    }
}

/// Pretty JSON with four-space indentation, the layout ground-control tools expect.
pub fn render_document(document: &MissionDocument) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .context("serializing mission document")?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use missioncore::ErrorKind;

    const CELLS: &[u8] = br#"[
        {"cell_id": "SA_Grid_001", "latitude": -34.9285, "longitude": 138.6007, "risk_value": 75, "risk_type": "probability"},
        {"cell_id": "SA_Grid_002", "latitude": -34.95}
    ]"#;

    #[test]
    fn runner_executes_and_counts() {
        let runner = Runner::new(AdapterConfig::default());
        let params = runner.parameters(Some("50"), Some("10")).unwrap();
        let conversion = runner.execute(CELLS, &params).unwrap();

        assert_eq!(conversion.waypoint_count(), 1);
        assert_eq!(conversion.rejections.len(), 1);
        let snapshot = runner.metrics();
        assert_eq!(snapshot.runs, 1);
        assert_eq!(snapshot.waypoints, 1);
        assert_eq!(snapshot.rejected_records, 1);
    }

    #[test]
    fn failed_run_is_counted() {
        let runner = Runner::new(AdapterConfig::default());
        let params = runner.parameters(None, None).unwrap();
        let err = runner.execute(b"{}", &params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(runner.metrics().failed_runs, 1);
    }

    #[test]
    fn missing_fields_use_config_defaults() {
        let runner = Runner::new(AdapterConfig::default());
        let params = runner.parameters(None, Some(" ")).unwrap();
        assert_eq!(params, MissionParameters::default());
    }

    #[test]
    fn bad_fields_are_invalid_parameters() {
        let runner = Runner::new(AdapterConfig::default());
        for (altitude, hover) in [(Some("high"), None), (Some("-5"), None), (None, Some("-1"))] {
            let err = runner.parameters(altitude, hover).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidMissionParameters);
        }
    }

    #[test]
    fn rendered_document_uses_four_space_indent() {
        let runner = Runner::new(AdapterConfig::default());
        let params = runner.parameters(None, None).unwrap();
        let conversion = runner.execute(CELLS, &params).unwrap();
        let text = String::from_utf8(render_document(&conversion.document).unwrap()).unwrap();

        assert!(text.starts_with("{\n    \"type\": \"FeatureCollection\""));
        let parsed: MissionDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, conversion.document);
    }
}
