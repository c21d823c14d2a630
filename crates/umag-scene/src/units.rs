//! Output units for field values.

use std::fmt;
use std::str::FromStr;
use umag_core::SceneError;

/// Unit in which field views report values.
///
/// Frequencies are electron Zeeman frequencies for g = 2
/// (28.5714 GHz per tesla).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FieldUnit {
    /// Tesla.
    #[default]
    Tesla,
    /// Millitesla.
    MilliTesla,
    /// Gigahertz.
    GHz,
    /// Megahertz.
    MHz,
}

impl FieldUnit {
    /// Multiplier from tesla to this unit.
    pub fn factor(self) -> f64 {
        match self {
            Self::Tesla => 1.0,
            Self::MilliTesla => 1e3,
            Self::GHz => 28.5714,
            Self::MHz => 28.5714e3,
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tesla => "T",
            Self::MilliTesla => "mT",
            Self::GHz => "GHz",
            Self::MHz => "MHz",
        }
    }
}

impl FromStr for FieldUnit {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "T" => Ok(Self::Tesla),
            "mT" => Ok(Self::MilliTesla),
            "GHz" => Ok(Self::GHz),
            "MHz" => Ok(Self::MHz),
            _ => Err(SceneError::InvalidUnit {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FieldUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multiplier from tesla to the unit called `name`.
///
/// Recognized names are `T`, `mT`, `GHz` and `MHz`.
pub fn unit_conversion(name: &str) -> Result<f64, SceneError> {
    name.parse::<FieldUnit>().map(FieldUnit::factor)
}
