//! Swept construction parameters.
//!
//! A [`SweepValue`] is a named, unit-labelled N-dimensional array of
//! candidate values for one builder argument, with an explicit or
//! auto-assigned target axis per dimension. Builder calls accept either
//! a plain scalar or a sweep; the grid crate turns every sweep into one
//! grid axis per dimension.
//!
//! # Construction
//!
//! - [`SweepValue::from_data`] from a [`SweepData`] description
//! - [`SweepValue::linspace`], [`SweepValue::logspace`],
//!   [`SweepValue::geomspace`] for one-dimensional ranges
//!
//! # Combination
//!
//! Scalars combine through the usual operators. Two sweeps combine with
//! [`SweepValue::try_add`]: different axes produce an outer sum, the same
//! axis an elementwise sum.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arith;
pub mod range;
pub mod sweep;

pub use sweep::{SweepAxis, SweepData, SweepItem, SweepValue, NO_LABEL};
