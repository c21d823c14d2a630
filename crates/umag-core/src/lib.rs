//! Core types for the umag micromagnet design workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate: sweep identifiers, the
//! [`Shape`] alias, the dense N-dimensional [`DenseArray`], small 3-vector
//! helpers, and the error taxonomy for sweeps, grids and scenes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod error;
pub mod id;
pub mod vector;

pub use array::{DenseArray, Shape};
pub use error::{GridError, SceneError, SweepError};
pub use id::SweepId;
pub use vector::{Axis3, Vec3};
