//! Test utilities and mock field sources for umag development.
//!
//! Provides mock implementations of [`FieldSource`] and canned scene
//! grids for constructing test scenarios without going through a full
//! designer session.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use umag_core::{vector, Vec3};
use umag_scene::FieldSource;

/// Field source with a prescribed affine field `B(p) = b0 + G p`.
///
/// `gradient[c][m]` is `dB_c/dp_m` in T/nm, positions are metres like
/// every [`FieldSource`]. Every call to
/// [`translate_geometry`](FieldSource::translate_geometry) is recorded.
pub struct RecordingSource {
    pub b0: Vec3,
    pub gradient: [Vec3; 3],
    offset: Vec3,
    moves: Vec<Vec3>,
}

impl RecordingSource {
    pub fn new(b0: Vec3, gradient: [Vec3; 3]) -> Self {
        Self {
            b0,
            gradient,
            offset: [0.0; 3],
            moves: Vec::new(),
        }
    }

    /// A source whose field is the same everywhere.
    pub fn uniform(b0: Vec3) -> Self {
        Self::new(b0, [[0.0; 3]; 3])
    }

    /// Every displacement applied so far, in order.
    pub fn moves(&self) -> &[Vec3] {
        &self.moves
    }

    /// Net displacement.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }
}

impl FieldSource for RecordingSource {
    fn evaluate_field(&self, positions: &[Vec3]) -> Vec<Vec3> {
        positions
            .iter()
            .map(|&p| {
                let q = vector::scale(vector::sub(p, self.offset), 1e9);
                [0, 1, 2].map(|c| self.b0[c] + vector::dot(self.gradient[c], q))
            })
            .collect()
    }

    fn translate_geometry(&mut self, displacement: Vec3) {
        self.offset = vector::add(self.offset, displacement);
        self.moves.push(displacement);
    }
}

/// Wraps any source and counts evaluations.
///
/// `evaluate_field` takes `&self`, so the count lives in a `Cell`.
pub struct CountingSource<S> {
    pub inner: S,
    calls: std::cell::Cell<usize>,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: std::cell::Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<S: FieldSource> FieldSource for CountingSource<S> {
    fn evaluate_field(&self, positions: &[Vec3]) -> Vec<Vec3> {
        self.calls.set(self.calls.get() + 1);
        self.inner.evaluate_field(positions)
    }

    fn translate_geometry(&mut self, displacement: Vec3) {
        self.inner.translate_geometry(displacement);
    }
}
