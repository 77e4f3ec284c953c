pub mod errors;

pub use errors::{SampleLocation, TmmError, TmmErrorCategory, TmmResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Serial,
    Parallel,
}

/// Field orientation relative to the plane of incidence. One polarization is
/// selected per sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Polarization {
    #[default]
    #[serde(rename = "s")]
    S,
    #[serde(rename = "p")]
    P,
}

impl Polarization {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "s",
            Self::P => "p",
        }
    }
}

impl Display for Polarization {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for Polarization {
    type Err = TmmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "s" | "S" => Ok(Self::S),
            "p" | "P" => Ok(Self::P),
            other => Err(TmmError::configuration(
                "CONFIG.POLARIZATION",
                format!("polarization must be 's' or 'p', got '{other}'"),
            )),
        }
    }
}
