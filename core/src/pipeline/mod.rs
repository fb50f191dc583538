pub mod assembler;
pub mod builder;
pub mod decoder;
pub mod validator;

pub use assembler::MissionAssembler;
pub use builder::{describe, WaypointBuilder};
pub use decoder::InputDecoder;
pub use validator::{RecordValidator, Validation};

use crate::mission::{MissionDocument, MissionParameters, RejectionRecord};
use crate::prelude::{RunResult, Stage};
use crate::telemetry::log::LogManager;

/// Result of one successful run: the document plus every rejected record.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub document: MissionDocument,
    pub rejections: Vec<RejectionRecord>,
}

impl Conversion {
    pub fn waypoint_count(&self) -> usize {
        self.document.waypoint_count()
    }
}

/// Runs decoder, validator, builder and assembler over one upload.
///
/// Only malformed input or invalid parameters fail the call; a run where
/// every record was rejected still yields an (empty) document.
pub fn convert(raw: &[u8], params: &MissionParameters) -> RunResult<Conversion> {
    let logger = LogManager::new("convert");
    params.validate()?;

    let records = InputDecoder::new().decode(raw)?;
    let total = records.len();
    let validation = RecordValidator::new().execute(records)?;
    let rejections = validation.rejected;
    let waypoints = WaypointBuilder::new(*params).execute(validation.accepted)?;
    let document = MissionAssembler::new(*params, rejections.len()).execute(waypoints)?;

    logger.record(&format!(
        "{} records -> {} waypoints, {} rejected",
        total,
        document.waypoint_count(),
        rejections.len()
    ));

    Ok(Conversion {
        document,
        rejections,
    })
}
