//! Top-level error type for designer sessions.

use crate::config::ConfigError;
use std::error::Error;
use std::fmt;
use umag_core::{GridError, SceneError, SweepError};

/// Any failure of a [`MagnetDesigner`](crate::MagnetDesigner) operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DesignError {
    /// Sweep construction or arithmetic failed.
    Sweep(SweepError),
    /// Grid growth, axis registration or dispatch failed.
    Grid(GridError),
    /// A scene operation or field view failed.
    Scene(SceneError),
    /// The session configuration is invalid.
    Config(ConfigError),
    /// A single-scene view was requested on a grid of several cells.
    MultidimensionalView {
        /// Number of cells in the grid.
        cells: usize,
    },
    /// A cell index does not address a cell of the grid.
    CellOutOfBounds {
        /// The requested index.
        index: Vec<usize>,
        /// The grid shape.
        shape: Vec<usize>,
    },
}

impl fmt::Display for DesignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sweep(e) => write!(f, "sweep: {e}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Scene(e) => write!(f, "scene: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::MultidimensionalView { cells } => write!(
                f,
                "view needs a single scene but the grid holds {cells}; select a cell first"
            ),
            Self::CellOutOfBounds { index, shape } => {
                write!(f, "cell {index:?} is outside grid of shape {shape:?}")
            }
        }
    }
}

impl Error for DesignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sweep(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Scene(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SweepError> for DesignError {
    fn from(e: SweepError) -> Self {
        Self::Sweep(e)
    }
}

impl From<GridError> for DesignError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<SceneError> for DesignError {
    fn from(e: SceneError) -> Self {
        Self::Scene(e)
    }
}

impl From<ConfigError> for DesignError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_and_exposes_source() {
        let e: DesignError = SceneError::InvalidUnit {
            name: "Gauss".into(),
        }
        .into();
        assert!(e.source().is_some());
        assert!(e.to_string().contains("Gauss"));
        assert!(DesignError::MultidimensionalView { cells: 4 }
            .source()
            .is_none());
    }
}
