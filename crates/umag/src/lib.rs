//! umag: parametric micromagnet design for spin-qubit field gradients.
//!
//! This is the top-level facade crate. It provides the
//! [`MagnetDesigner`] session and re-exports the public API of the
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use umag::prelude::*;
//!
//! // Sweep the width of a magnet over five values.
//! let width = SweepValue::linspace(20.0, 80.0, 5)
//!     .unwrap()
//!     .named("width", "nm");
//!
//! let mut design = MagnetDesigner::new();
//! design.add_cube([0.0, 0.0, 0.0], (&width, 100.0, 50.0)).unwrap();
//! design.add_observation_position([0.0, 0.0, -80.0]).unwrap();
//! assert_eq!(design.shape(), &[5]);
//!
//! let field = design.qubit_field().unwrap();
//! let bx = field.b("x", FieldUnit::MilliTesla).unwrap();
//! assert_eq!(bx.shape(), &[5, 1]);
//! assert_eq!(field.setpoint(0).unwrap().label, "width");
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `umag-core` | Errors, ids, `DenseArray`, vectors |
//! | [`sweep`] | `umag-sweep` | `SweepValue`, ranges, arithmetic |
//! | [`grid`] | `umag-grid` | Object grid, setpoints, broadcast dispatch |
//! | [`scene`] | `umag-scene` | Scene records, box-magnet fields, views |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod designer;
pub mod error;

pub use config::{ConfigError, DesignerConfig};
pub use designer::{IntoPoint, MagnetDesigner};
pub use error::DesignError;

/// Core types, ids and errors (`umag-core`).
pub use umag_core as types;

/// Sweep values (`umag-sweep`).
pub use umag_sweep as sweep;

/// Object grid, setpoint registry and dispatcher (`umag-grid`).
///
/// Use these directly to drive a grid of your own record type.
pub use umag_grid as grid;

/// Scene records, the analytic field source and field views
/// (`umag-scene`).
pub use umag_scene as scene;

/// Common imports for typical umag usage.
///
/// ```rust
/// use umag::prelude::*;
/// ```
pub mod prelude {
    // Session
    pub use crate::{DesignError, DesignerConfig, IntoPoint, MagnetDesigner};

    // Core
    pub use umag_core::{Axis3, DenseArray, Vec3};

    // Sweeps
    pub use umag_sweep::{SweepAxis, SweepData, SweepItem, SweepValue};

    // Grid
    pub use umag_grid::{ObjectGrid, Param, Setpoint, SetpointRegistry};

    // Scene and views
    pub use umag_scene::{
        DerivativeConfig, FieldMap, FieldSource, FieldUnit, FiniteDifference, MagnetCollection,
        ProbeLattice, QubitField, SceneRecord,
    };
}
