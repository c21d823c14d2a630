//! Session configuration and its validation.

use std::error::Error;
use std::fmt;
use umag_core::Vec3;
use umag_scene::{DerivativeConfig, FieldUnit};

/// Errors detected by [`DesignerConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The derivative step is NaN, infinite, zero, or negative.
    InvalidStep {
        /// The configured step (nm).
        value: f64,
    },
    /// The default slab count for triangles is zero.
    ZeroSlabCount,
    /// The default magnetisation has a non-finite component.
    InvalidMagnetisation {
        /// The configured vector.
        value: Vec3,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStep { value } => {
                write!(f, "derivative step must be finite and positive, got {value}")
            }
            Self::ZeroSlabCount => write!(f, "default_slab_count must be at least 1"),
            Self::InvalidMagnetisation { value } => {
                write!(f, "default magnetisation must be finite, got {value:?}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings for a [`MagnetDesigner`](crate::MagnetDesigner) session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DesignerConfig {
    /// Slabs per triangle when a call does not pass `n_slabs`. Default: 20.
    pub default_slab_count: usize,
    /// Finite-difference settings used by field views.
    pub derivative: DerivativeConfig,
    /// Magnetisation of freshly created scene records (tesla).
    /// Default: `(1, 0, 0)`.
    pub default_magnetisation: Vec3,
    /// Preferred output unit for field views. Default: tesla.
    pub unit: FieldUnit,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            default_slab_count: 20,
            derivative: DerivativeConfig::default(),
            default_magnetisation: [1.0, 0.0, 0.0],
            unit: FieldUnit::Tesla,
        }
    }
}

impl DesignerConfig {
    /// Check every structural invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let step = self.derivative.step_nm;
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::InvalidStep { value: step });
        }
        if self.default_slab_count == 0 {
            return Err(ConfigError::ZeroSlabCount);
        }
        if self.default_magnetisation.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidMagnetisation {
                value: self.default_magnetisation,
            });
        }
        Ok(())
    }
}
