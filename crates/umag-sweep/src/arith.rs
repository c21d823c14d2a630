//! Sweep arithmetic.
//!
//! Scalar operations keep every piece of metadata, including display set
//! values, and only transform the raw values. Sweep-with-sweep addition
//! goes through [`SweepValue::try_add`] because it can fail.

use crate::sweep::SweepValue;
use smallvec::smallvec;
use std::ops::{Add, Div, Mul, Neg, Sub};
use umag_core::{DenseArray, SweepError, SweepId};

impl SweepValue {
    /// Add two one-dimensional sweeps.
    ///
    /// - Different axes: the result is a two-dimensional outer sum. The
    ///   sweep on the larger axis becomes the leading dimension, with
    ///   `Auto` counting as the smallest.
    /// - Same axis: lengths must agree and values add elementwise. The
    ///   axis, labels and units of `self` are kept and a warning is
    ///   logged.
    ///
    /// Returns `Err(SweepError::UnsupportedCombination)` if either sweep
    /// has more than one dimension, or the same-axis lengths differ.
    pub fn try_add(&self, other: &SweepValue) -> Result<SweepValue, SweepError> {
        if self.ndim() != 1 || other.ndim() != 1 {
            return Err(SweepError::UnsupportedCombination {
                reason: format!(
                    "only one-dimensional sweeps can be added, got shapes {:?} and {:?}",
                    self.shape(),
                    other.shape()
                ),
            });
        }

        if self.axes[0] == other.axes[0] {
            log::warn!(
                "adding two sweeps on axis {:?}; only the axis and labels of the first are kept",
                self.axes[0]
            );
            let values = self
                .values
                .zip_map(&other.values, |a, b| a + b)
                .ok_or_else(|| SweepError::UnsupportedCombination {
                    reason: format!(
                        "sweeps on the same axis need equal lengths, got {} and {}",
                        self.len(),
                        other.len()
                    ),
                })?;
            return Ok(self.derive(values));
        }

        let (outer, inner) = if self.axes[0] < other.axes[0] {
            (other, self)
        } else {
            (self, other)
        };
        let values = DenseArray::outer(&outer.values, &inner.values, |a, b| a + b).ok_or_else(
            || SweepError::UnsupportedCombination {
                reason: "outer sum needs one-dimensional operands".to_string(),
            },
        )?;
        let set_values = match (&outer.set_values, &inner.set_values) {
            (Some(a), Some(b)) => Some(vec![a[0].clone(), b[0].clone()]),
            _ => None,
        };
        let id = SweepId::next();
        Ok(SweepValue {
            id,
            origin: id,
            values,
            axes: smallvec![outer.axes[0], inner.axes[0]],
            labels: vec![outer.labels[0].clone(), inner.labels[0].clone()],
            units: vec![outer.units[0].clone(), inner.units[0].clone()],
            set_values,
            no_setpoints: self.no_setpoints,
        })
    }
}

macro_rules! scalar_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<f64> for &SweepValue {
            type Output = SweepValue;

            fn $method(self, rhs: f64) -> SweepValue {
                self.derive(self.values.map(|v| v $op rhs))
            }
        }

        impl $trait<f64> for SweepValue {
            type Output = SweepValue;

            fn $method(self, rhs: f64) -> SweepValue {
                (&self).$method(rhs)
            }
        }

        impl $trait<&SweepValue> for f64 {
            type Output = SweepValue;

            fn $method(self, rhs: &SweepValue) -> SweepValue {
                rhs.derive(rhs.values.map(|v| self $op v))
            }
        }

        impl $trait<SweepValue> for f64 {
            type Output = SweepValue;

            fn $method(self, rhs: SweepValue) -> SweepValue {
                self.$method(&rhs)
            }
        }
    };
}

scalar_op!(Add, add, +);
scalar_op!(Sub, sub, -);
scalar_op!(Mul, mul, *);
scalar_op!(Div, div, /);

impl Neg for &SweepValue {
    type Output = SweepValue;

    fn neg(self) -> SweepValue {
        self.derive(self.values.map(|v| -v))
    }
}

impl Neg for SweepValue {
    type Output = SweepValue;

    fn neg(self) -> SweepValue {
        -&self
    }
}
