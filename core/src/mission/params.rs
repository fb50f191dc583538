use crate::prelude::{RunError, RunResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ALTITUDE_M: f64 = 60.0;
pub const DEFAULT_HOVER_TIME_S: f64 = 120.0;

/// Flight parameters applied uniformly to every waypoint of one mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionParameters {
    pub altitude_m: f64,
    pub hover_time_s: f64,
}

impl MissionParameters {
    /// Builds parameters and checks them in one step.
    pub fn new(altitude_m: f64, hover_time_s: f64) -> RunResult<Self> {
        let params = Self {
            altitude_m,
            hover_time_s,
        };
        params.validate()?;
        Ok(params)
    }

    /// Altitude must be finite and strictly positive, hover time finite and non-negative.
    pub fn validate(&self) -> RunResult<()> {
        if !self.altitude_m.is_finite() || self.altitude_m <= 0.0 {
            return Err(RunError::InvalidMissionParameters(format!(
                "altitude_m must be a finite number > 0, got {}",
                self.altitude_m
            )));
        }
        if !self.hover_time_s.is_finite() || self.hover_time_s < 0.0 {
            return Err(RunError::InvalidMissionParameters(format!(
                "hover_time_s must be a finite number >= 0, got {}",
                self.hover_time_s
            )));
        }
        Ok(())
    }
}

impl Default for MissionParameters {
    fn default() -> Self {
        Self {
            altitude_m: DEFAULT_ALTITUDE_M,
            hover_time_s: DEFAULT_HOVER_TIME_S,
        }
    }
}
