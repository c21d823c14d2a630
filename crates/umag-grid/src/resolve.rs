//! Dimension resolution for one sweep dimension.

use smallvec::SmallVec;
use umag_core::{GridError, Shape};
use umag_sweep::SweepAxis;

/// Compute the grid shape after placing one sweep dimension of length
/// `len` on `axis`, and the concrete axis used.
///
/// `current` lists extents outermost first; axis `k` is the dimension at
/// position `current.len() - 1 - k`.
///
/// - `Auto`: a trailing dimension of extent 1 is reused (concrete axis 0,
///   counted from the trailing end, so `[3, 1]` yields axis 0 not 1);
///   otherwise a new outermost dimension is prepended and becomes the
///   highest axis.
/// - `Index(k)` with `k >= current.len()`: the shape is left-padded with
///   extent-1 dimensions and the new outermost one takes `len`.
/// - `Index(k)` inside the shape: an equal extent is kept, an extent of 1
///   grows to `len`.
///
/// # Errors
///
/// Returns `GridError::IncompatibleAxis` if the existing extent on an
/// explicit axis is neither 1 nor `len`.
pub fn resolve_new_shape(
    current: &[usize],
    axis: SweepAxis,
    len: usize,
) -> Result<(Shape, usize), GridError> {
    let ndim = current.len();
    match axis {
        SweepAxis::Auto => {
            // The reused dimension is the innermost one, so its axis is 0
            // whatever `ndim` is: on `[3, 1]` the result is `([3, n], 0)`.
            if current.last() == Some(&1) {
                let mut shape: Shape = SmallVec::from_slice(current);
                shape[ndim - 1] = len;
                Ok((shape, 0))
            } else {
                let mut shape: Shape = SmallVec::with_capacity(ndim + 1);
                shape.push(len);
                shape.extend_from_slice(current);
                Ok((shape, ndim))
            }
        }
        SweepAxis::Index(k) if k >= ndim => {
            let mut shape: Shape = SmallVec::from_elem(1, k + 1);
            shape[k + 1 - ndim..].copy_from_slice(current);
            shape[0] = len;
            Ok((shape, k))
        }
        SweepAxis::Index(k) => {
            let pos = ndim - 1 - k;
            let existing = current[pos];
            let mut shape: Shape = SmallVec::from_slice(current);
            if existing == len {
                Ok((shape, k))
            } else if existing == 1 {
                shape[pos] = len;
                Ok((shape, k))
            } else {
                Err(GridError::IncompatibleAxis {
                    axis: k,
                    existing,
                    requested: len,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn auto_reuses_trailing_unit_dimension() {
        let (shape, axis) = resolve_new_shape(&[1], SweepAxis::Auto, 5).unwrap();
        assert_eq!(shape.as_slice(), &[5]);
        assert_eq!(axis, 0);

        let (shape, axis) = resolve_new_shape(&[3, 1], SweepAxis::Auto, 4).unwrap();
        assert_eq!(shape.as_slice(), &[3, 4]);
        assert_eq!(axis, 0);
    }

    #[test]
    fn auto_prepends_when_trailing_is_taken() {
        let (shape, axis) = resolve_new_shape(&[3], SweepAxis::Auto, 4).unwrap();
        assert_eq!(shape.as_slice(), &[4, 3]);
        assert_eq!(axis, 1);
    }

    #[test]
    fn explicit_axis_beyond_shape_pads() {
        let (shape, axis) = resolve_new_shape(&[3], SweepAxis::Index(5), 7).unwrap();
        assert_eq!(shape.as_slice(), &[7, 1, 1, 1, 1, 3]);
        assert_eq!(axis, 5);

        let (shape, _) = resolve_new_shape(&[2, 3], SweepAxis::Index(2), 4).unwrap();
        assert_eq!(shape.as_slice(), &[4, 2, 3]);
    }

    #[test]
    fn explicit_axis_inside_shape() {
        let (shape, _) = resolve_new_shape(&[1, 3], SweepAxis::Index(1), 6).unwrap();
        assert_eq!(shape.as_slice(), &[6, 3]);
        let (shape, _) = resolve_new_shape(&[6, 3], SweepAxis::Index(0), 3).unwrap();
        assert_eq!(shape.as_slice(), &[6, 3]);
    }

    #[test]
    fn explicit_axis_conflict_is_incompatible() {
        let err = resolve_new_shape(&[6, 3], SweepAxis::Index(0), 4).unwrap_err();
        assert_eq!(
            err,
            GridError::IncompatibleAxis {
                axis: 0,
                existing: 3,
                requested: 4
            }
        );
    }

    proptest! {
        #[test]
        fn resolved_axis_holds_sweep_length(
            shape in prop::collection::vec(1usize..5, 1..5),
            axis in prop::option::of(0usize..6),
            len in 1usize..6,
        ) {
            let axis = axis.map_or(SweepAxis::Auto, SweepAxis::Index);
            if let Ok((new, k)) = resolve_new_shape(&shape, axis, len) {
                prop_assert!(new.len() >= shape.len());
                prop_assert_eq!(new[new.len() - 1 - k], len);
                // Every pre-existing extent either survives or grew from 1.
                let offset = new.len() - shape.len();
                for (d, &old) in shape.iter().enumerate() {
                    let now = new[offset + d];
                    prop_assert!(now == old || old == 1);
                }
            }
        }
    }
}
