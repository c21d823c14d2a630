//! Finite-difference field gradients by rigid displacement.
//!
//! The geometry is translated in place around each probe and restored
//! before the next axis, so a gradient computation needs exclusive
//! access to its source for its whole duration.

use crate::collection::FieldSource;
use crate::record::NM;
use umag_core::vector::{self, Axis3};
use umag_core::Vec3;

/// Difference scheme for [`field_gradient`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FiniteDifference {
    /// Geometry moved by `-h`, compared with the undisplaced field.
    #[default]
    Forward,
    /// Geometry moved by `-h` and `+h`, difference over `2h`.
    Central,
}

/// Step and scheme for numerical derivatives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivativeConfig {
    /// Displacement step in nanometres.
    pub step_nm: f64,
    /// Difference scheme.
    pub scheme: FiniteDifference,
}

impl Default for DerivativeConfig {
    fn default() -> Self {
        Self {
            step_nm: 0.5,
            scheme: FiniteDifference::Forward,
        }
    }
}

/// Field derivatives with respect to qubit displacement, in T/nm.
///
/// `per_axis[m][p][c]` is `dB_c / d(position_m)` at point `p`.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    /// One row of per-point derivative vectors per displacement axis.
    pub per_axis: [Vec<Vec3>; 3],
}

impl Gradient {
    /// Derivatives for displacement along `axis`.
    pub fn along(&self, axis: Axis3) -> &[Vec3] {
        &self.per_axis[axis.index()]
    }
}

fn difference(a: &[Vec3], b: &[Vec3], denom: f64) -> Vec<Vec3> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| vector::scale(vector::sub(x, y), 1.0 / denom))
        .collect()
}

/// Derivative of the field at `positions` (metres) with respect to
/// moving the qubits, by displacing the geometry the opposite way.
///
/// For each axis in x, y, z order the source is translated by `-h`,
/// probed, then moved back (central: on to `+h`, probed, then back by
/// `-h`) so it ends where it started. `base` is the undisplaced field at
/// `positions`, as returned by the caller's own evaluation.
pub fn field_gradient<S: FieldSource + ?Sized>(
    source: &mut S,
    positions: &[Vec3],
    base: &[Vec3],
    config: &DerivativeConfig,
) -> Gradient {
    let h = config.step_nm;
    let per_axis = Axis3::ALL.map(|axis| {
        let step = vector::along(axis, h * NM);
        let back = vector::along(axis, -h * NM);
        source.translate_geometry(back);
        let minus = source.evaluate_field(positions);
        match config.scheme {
            FiniteDifference::Forward => {
                source.translate_geometry(step);
                difference(&minus, base, h)
            }
            FiniteDifference::Central => {
                source.translate_geometry(vector::scale(step, 2.0));
                let plus = source.evaluate_field(positions);
                source.translate_geometry(back);
                difference(&minus, &plus, 2.0 * h)
            }
        }
    });
    Gradient { per_axis }
}
