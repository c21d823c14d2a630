//! Error types for the umag workspace.
//!
//! Organized by subsystem: sweep construction and arithmetic, grid
//! growth and dispatch, and scene building / field evaluation. None of
//! these are recoverable inside a builder call; they propagate to the
//! caller, which is expected to rebuild the session.

use std::error::Error;
use std::fmt;

/// Errors from constructing or combining sweep values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SweepError {
    /// Axis, label, unit or set-value lengths disagree with the value
    /// dimensionality, or explicit axes are not strictly descending.
    DimensionMismatch {
        /// What disagreed.
        reason: String,
    },
    /// Two sweeps cannot be combined by the requested arithmetic.
    UnsupportedCombination {
        /// Why the combination was rejected.
        reason: String,
    },
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { reason } => write!(f, "dimension mismatch: {reason}"),
            Self::UnsupportedCombination { reason } => {
                write!(f, "unsupported sweep combination: {reason}")
            }
        }
    }
}

impl Error for SweepError {}

/// Errors from growing the object grid or dispatching a builder call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The grid already has a dimension of a different length on the
    /// requested axis.
    IncompatibleAxis {
        /// Axis index, counted from the innermost dimension.
        axis: usize,
        /// Length currently held by the grid on that axis.
        existing: usize,
        /// Length requested by the sweep.
        requested: usize,
    },
    /// A setpoint for this axis is already registered with a different
    /// label, unit or coordinate length.
    DuplicateAxis {
        /// Axis index, counted from the innermost dimension.
        axis: usize,
        /// Which attribute conflicted.
        reason: String,
    },
    /// The requested dispatch feature is not supported.
    NotImplemented {
        /// Description of the unsupported feature.
        feature: String,
    },
    /// A sweep resolved to axes that are not strictly descending, so its
    /// leading dimension would not follow the outer loop.
    UnorderedAxes {
        /// The concrete axes after resolution.
        axes: Vec<usize>,
    },
    /// A sweep argument still had dimensions left when a grid cell was
    /// reached.
    UnresolvedSweep {
        /// Positional index of the argument.
        position: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompatibleAxis {
                axis,
                existing,
                requested,
            } => write!(
                f,
                "dimensions on loop axis {axis} not compatible with previous loops \
                 (current length {existing}, wanted {requested}); \
                 change the loop axis or update the length"
            ),
            Self::DuplicateAxis { axis, reason } => {
                write!(f, "setpoint for axis {axis} already registered: {reason}")
            }
            Self::NotImplemented { feature } => write!(f, "not implemented: {feature}"),
            Self::UnorderedAxes { axes } => {
                write!(f, "sweep resolved to non-descending axes {axes:?}")
            }
            Self::UnresolvedSweep { position } => {
                write!(f, "sweep argument {position} has unresolved dimensions")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from scene building, realization and field views.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneError {
    /// Unknown field unit name.
    InvalidUnit {
        /// The name that was supplied.
        name: String,
    },
    /// Triangle corners do not project onto exactly two distinct values
    /// along each in-plane axis.
    DegenerateTriangle {
        /// Which projection failed.
        reason: String,
    },
    /// The slab count for a tessellation is not a positive integer.
    InvalidSlabCount {
        /// The value that was supplied.
        value: f64,
    },
    /// Grid cells disagree on the number of observation points.
    InconsistentObservations {
        /// Count found in the first cell.
        expected: usize,
        /// Count found in the offending cell.
        found: usize,
        /// Flat index of the offending cell.
        cell: usize,
    },
    /// A probe lattice specification is malformed.
    InvalidLattice {
        /// What was wrong.
        reason: String,
    },
    /// A direction string contains something other than `x`, `y` or `z`.
    InvalidComponent {
        /// The string that was supplied.
        name: String,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUnit { name } => {
                write!(f, "invalid unit '{name}', options: T, mT, GHz, MHz")
            }
            Self::DegenerateTriangle { reason } => write!(f, "degenerate triangle: {reason}"),
            Self::InvalidSlabCount { value } => {
                write!(f, "slab count must be a positive integer, got {value}")
            }
            Self::InconsistentObservations {
                expected,
                found,
                cell,
            } => write!(
                f,
                "cell {cell} has {found} observation points, expected {expected}"
            ),
            Self::InvalidLattice { reason } => write!(f, "invalid probe lattice: {reason}"),
            Self::InvalidComponent { name } => {
                write!(f, "invalid direction '{name}', expected a combination of x, y, z")
            }
        }
    }
}

impl Error for SceneError {}
