use crate::geo::coords::{coerce_coordinate, latitude_in_range, longitude_in_range};
use crate::mission::{PointMetadata, RawRecord, RejectionRecord, ValidatedPoint};
use crate::prelude::{ErrorKind, RunResult, Stage};
use crate::telemetry::log::LogManager;

/// Accepted and rejected records, each in original input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    pub accepted: Vec<ValidatedPoint>,
    pub rejected: Vec<RejectionRecord>,
}

/// Per-record geographic checks; a bad record never fails the run.
pub struct RecordValidator {
    logger: LogManager,
}

impl RecordValidator {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("validator"),
        }
    }

    /// Applies the rules in precedence order; the first failure is the reason.
    pub fn classify(index: usize, raw: &RawRecord) -> Result<ValidatedPoint, ErrorKind> {
        let record = raw.as_object().ok_or(ErrorKind::InvalidRecordShape)?;

        let (raw_lat, raw_lon) = match (record.get("latitude"), record.get("longitude")) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(ErrorKind::MissingCoordinates),
        };

        let latitude = coerce_coordinate(raw_lat).ok_or(ErrorKind::NonNumericCoordinate)?;
        let longitude = coerce_coordinate(raw_lon).ok_or(ErrorKind::NonNumericCoordinate)?;

        if !latitude_in_range(latitude) || !longitude_in_range(longitude) {
            return Err(ErrorKind::CoordinateOutOfRange);
        }

        Ok(ValidatedPoint {
            latitude,
            longitude,
            index,
            metadata: PointMetadata {
                cell_id: record.get("cell_id").cloned(),
                risk_value: record.get("risk_value").cloned(),
                risk_type: record.get("risk_type").cloned(),
            },
        })
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage<Vec<RawRecord>> for RecordValidator {
    type Output = Validation;

    fn name(&self) -> &'static str {
        "validator"
    }

    fn execute(&self, input: Vec<RawRecord>) -> RunResult<Self::Output> {
        let mut validation = Validation::default();

        for (index, raw) in input.iter().enumerate() {
            match Self::classify(index, raw) {
                Ok(point) => validation.accepted.push(point),
                Err(reason) => {
                    self.logger
                        .warn(&format!("record {} rejected: {}", index, reason));
                    validation
                        .rejected
                        .push(RejectionRecord::new(index, reason, raw));
                }
            }
        }

        self.logger.record(&format!(
            "accepted {} / rejected {}",
            validation.accepted.len(),
            validation.rejected.len()
        ));
        Ok(validation)
    }
}
