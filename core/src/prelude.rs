use serde::{Deserialize, Serialize};
use std::fmt;

/// Every failure category the converter can report, whole-run or per-record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedInput,
    InvalidMissionParameters,
    InvalidRecordShape,
    MissingCoordinates,
    NonNumericCoordinate,
    CoordinateOutOfRange,
}

impl ErrorKind {
    /// Whole-run kinds abort the conversion, the rest only reject one record.
    pub fn is_whole_run(self) -> bool {
        matches!(
            self,
            ErrorKind::MalformedInput | ErrorKind::InvalidMissionParameters
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::InvalidMissionParameters => "invalid_mission_parameters",
            ErrorKind::InvalidRecordShape => "invalid_record_shape",
            ErrorKind::MissingCoordinates => "missing_coordinates",
            ErrorKind::NonNumericCoordinate => "non_numeric_coordinate",
            ErrorKind::CoordinateOutOfRange => "coordinate_out_of_range",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error that aborts a whole conversion run before any output exists.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("invalid mission parameters: {0}")]
    InvalidMissionParameters(String),
}

impl RunError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::MalformedInput(_) => ErrorKind::MalformedInput,
            RunError::InvalidMissionParameters(_) => ErrorKind::InvalidMissionParameters,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            RunError::MalformedInput(detail) | RunError::InvalidMissionParameters(detail) => detail,
        }
    }
}

pub type RunResult<T> = Result<T, RunError>;

/// One step of the conversion pipeline.
///
/// Stages own no mutable state between calls; `execute` consumes the previous
/// stage's output and produces a new value.
pub trait Stage<I> {
    type Output;

    fn name(&self) -> &'static str;
    fn execute(&self, input: I) -> RunResult<Self::Output>;
}
