//! Per-configuration scene records and everything downstream of them.
//!
//! A [`SceneRecord`] is the payload stored in each grid cell: magnet
//! volumes, magnetisation, external field and qubit positions. Builder
//! operations on a record take nanometre and tesla inputs and store SI
//! metres.
//!
//! Realization turns records into [`MagnetCollection`]s, which implement
//! [`FieldSource`] through the closed-form field of uniformly polarized
//! boxes ([`BoxMagnet`]). Views evaluate collections:
//!
//! - [`QubitField`]: field and gradient at every qubit of every grid cell
//! - [`FieldMap`]: field of one scene on a [`ProbeLattice`]
//!
//! Gradients come from [`field_gradient`], which translates the geometry
//! in place and restores it after each probe.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collection;
pub mod derivative;
pub mod magnet;
pub mod record;
pub mod tessellate;
pub mod units;
pub mod view;

pub use collection::{realize, FieldSource, MagnetCollection};
pub use derivative::{field_gradient, DerivativeConfig, FiniteDifference, Gradient};
pub use magnet::BoxMagnet;
pub use record::{Cuboid, SceneRecord, NM};
pub use tessellate::tessellate_triangle;
pub use units::{unit_conversion, FieldUnit};
pub use view::{FieldMap, LatticeAxis, ProbeLattice, QubitField};
