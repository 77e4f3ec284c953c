//! Sweep settings, deserialised from camelCase JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{ExecutionMode, Polarization, TmmError, TmmResult};
use crate::modules::angle::{LayerAngle, incidence_angle};

pub const DEFAULT_CONSERVATION_ABS_TOL: f64 = 1.0e-9;

/// What to do when a sample breaks `R + T <= 1` or produces a negative power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConservationPolicy {
    Off,
    #[default]
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConservationCheck {
    pub policy: ConservationPolicy,
    pub abs_tol: f64,
}

impl Default for ConservationCheck {
    fn default() -> Self {
        Self {
            policy: ConservationPolicy::Warn,
            abs_tol: DEFAULT_CONSERVATION_ABS_TOL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SweepConfig {
    pub polarization: Polarization,
    /// Angle of incidence in the ambient medium (radians).
    pub incidence_angle: f64,
    pub execution_mode: ExecutionMode,
    pub conservation: ConservationCheck,
    /// Accept interior layers of zero thickness.
    pub allow_zero_thickness: bool,
}

impl SweepConfig {
    pub fn new(polarization: Polarization) -> Self {
        Self {
            polarization,
            ..Self::default()
        }
    }

    pub fn with_incidence_angle(mut self, theta: f64) -> Self {
        self.incidence_angle = theta;
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    pub fn with_conservation(mut self, policy: ConservationPolicy, abs_tol: f64) -> Self {
        self.conservation = ConservationCheck { policy, abs_tol };
        self
    }

    pub fn allowing_zero_thickness(mut self) -> Self {
        self.allow_zero_thickness = true;
        self
    }

    /// Checks the numeric settings and returns the ambient propagation angle.
    pub fn validate(&self) -> TmmResult<LayerAngle> {
        let abs_tol = self.conservation.abs_tol;
        if !abs_tol.is_finite() || abs_tol < 0.0 {
            return Err(TmmError::configuration(
                "CONFIG.CONSERVATION_TOLERANCE",
                format!("conservation tolerance must be finite and >= 0, got {abs_tol}"),
            ));
        }

        incidence_angle(self.incidence_angle)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SweepConfigError {
    #[error("failed to read sweep configuration '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse sweep configuration '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<SweepConfigError> for TmmError {
    fn from(error: SweepConfigError) -> Self {
        TmmError::configuration("CONFIG.SWEEP_FILE", error.to_string())
    }
}

pub fn load_sweep_config(config_path: impl AsRef<Path>) -> Result<SweepConfig, SweepConfigError> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| SweepConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| SweepConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}
