//! N-dimensional grids of independent per-configuration records.
//!
//! This crate turns builder calls with mixed scalar and sweep arguments
//! into one fully scalar call per grid cell:
//!
//! 1. [`resolve_call`] walks the sweep arguments, grows the
//!    [`ObjectGrid`] through [`resolve_new_shape`], remembers the concrete
//!    axes in [`SweepBindings`] and records labels in the
//!    [`SetpointRegistry`].
//! 2. [`fan_out`] visits every cell outermost-first and hands the cell's
//!    record to a per-cell closure together with its [`CellArgs`].
//!
//! Axis numbers count from the trailing (innermost) grid dimension, so
//! axis 0 is always the most deeply nested loop.
//!
//! The grid is generic over its record type; cells are cloned on growth
//! and never alias each other.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dispatch;
pub mod grid;
pub mod resolve;
pub mod setpoint;

pub use dispatch::{
    dispatch, fan_out, resolve_call, CallArgs, CellArgs, Param, ResolvedCall, ResolvedParam,
    ResolvedSweep, SweepBindings,
};
pub use grid::ObjectGrid;
pub use resolve::resolve_new_shape;
pub use setpoint::{Setpoint, SetpointRegistry};
