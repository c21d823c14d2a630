//! Decomposition of right triangles into rectangular slabs.

use crate::record::Cuboid;
use umag_core::vector::Axis3;
use umag_core::{SceneError, Vec3};

/// The value that occurs once and the value that occurs twice among the
/// three corners projected on one axis.
fn split_projection(values: [f64; 3], axis: Axis3) -> Result<(f64, f64), SceneError> {
    let [a, b, c] = values;
    if a == b && b != c {
        Ok((c, a))
    } else if a == c && b != c {
        Ok((b, a))
    } else if b == c && a != b {
        Ok((a, b))
    } else {
        Err(SceneError::DegenerateTriangle {
            reason: format!(
                "corners project onto {values:?} along {axis}; exactly two distinct values required"
            ),
        })
    }
}

/// Split a right triangle into `n` boxes of thickness `thickness`.
///
/// The triangle lies in the plane spanned by the two axes other than
/// `static_axis`, with its legs parallel to them. On the first in-plane
/// axis the span from the lone corner value to the shared value is cut
/// into `n` equal segments. Each segment becomes a box that starts at the
/// shared value of the second in-plane axis and reaches toward the lone
/// value, its extent sampled at the segment midpoint. Boxes are centered
/// on the first corner's `static_axis` coordinate.
///
/// Lengths are in whatever unit the corners use. The result depends only
/// on the inputs.
///
/// # Errors
///
/// - `SceneError::InvalidSlabCount` if `n == 0`.
/// - `SceneError::DegenerateTriangle` unless each in-plane projection of
///   the corners has exactly two distinct values.
pub fn tessellate_triangle(
    corners: [Vec3; 3],
    static_axis: Axis3,
    thickness: f64,
    n: usize,
) -> Result<Vec<Cuboid>, SceneError> {
    if n == 0 {
        return Err(SceneError::InvalidSlabCount { value: 0.0 });
    }
    let [a1, a2] = static_axis.others();
    let project = |axis: Axis3| corners.map(|p| p[axis.index()]);
    let (x_lone, x_shared) = split_projection(project(a1), a1)?;
    let (y_lone, y_shared) = split_projection(project(a2), a2)?;

    let step = (x_shared - x_lone) / n as f64;
    let level = corners[0][static_axis.index()];
    let mut slabs = Vec::with_capacity(n);
    for i in 0..n {
        let x0 = x_lone + step * i as f64;
        let x1 = if i + 1 == n {
            x_shared
        } else {
            x_lone + step * (i + 1) as f64
        };
        let y0 = y_shared;
        let y1 = y_shared - (y_shared - y_lone) * (i as f64 + 0.5) / n as f64;

        let mut center = [0.0; 3];
        let mut size = [0.0; 3];
        center[a1.index()] = (x0 + x1) / 2.0;
        size[a1.index()] = (x1 - x0).abs();
        center[a2.index()] = (y0 + y1) / 2.0;
        size[a2.index()] = (y1 - y0).abs();
        center[static_axis.index()] = level;
        size[static_axis.index()] = thickness.abs();
        slabs.push(Cuboid::new(center, size));
    }
    Ok(slabs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RIGHT: [Vec3; 3] = [[0.0, 0.0, 5.0], [100.0, 0.0, 5.0], [0.0, 50.0, 5.0]];

    #[test]
    fn slabs_cover_the_leg_span() {
        let slabs = tessellate_triangle(RIGHT, Axis3::Z, 10.0, 4).unwrap();
        assert_eq!(slabs.len(), 4);
        let total: f64 = slabs.iter().map(|s| s.size[0]).sum();
        assert!((total - 100.0).abs() < 1e-12);
        for s in &slabs {
            assert_eq!(s.center[2], 5.0);
            assert_eq!(s.size[2], 10.0);
        }
    }

    #[test]
    fn slab_heights_follow_hypotenuse() {
        // Lone x corner is 100 (the acute tip); heights grow toward x = 0.
        let slabs = tessellate_triangle(RIGHT, Axis3::Z, 1.0, 2).unwrap();
        assert_eq!(slabs[0].center[0], 75.0);
        assert_eq!(slabs[0].size[1], 12.5);
        assert_eq!(slabs[1].center[0], 25.0);
        assert_eq!(slabs[1].size[1], 37.5);
        assert_eq!(slabs[1].center[1], 18.75);
    }

    #[test]
    fn static_axis_selects_plane() {
        let corners = [[3.0, 0.0, 0.0], [3.0, 0.0, 40.0], [3.0, 20.0, 0.0]];
        let slabs = tessellate_triangle(corners, Axis3::X, 2.0, 5).unwrap();
        assert!(slabs.iter().all(|s| s.center[0] == 3.0 && s.size[0] == 2.0));
    }

    #[test]
    fn degenerate_corners_are_rejected() {
        let collinear = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let err = tessellate_triangle(collinear, Axis3::Z, 1.0, 3).unwrap_err();
        assert!(matches!(err, SceneError::DegenerateTriangle { .. }));

        let slanted = [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [2.0, 0.0, 0.0]];
        assert!(tessellate_triangle(slanted, Axis3::Z, 1.0, 3).is_err());
    }

    #[test]
    fn zero_slabs_is_invalid() {
        let err = tessellate_triangle(RIGHT, Axis3::Z, 1.0, 0).unwrap_err();
        assert!(matches!(err, SceneError::InvalidSlabCount { .. }));
    }

    proptest! {
        #[test]
        fn tessellation_is_deterministic(
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
            dx in 1.0f64..300.0,
            dy in 1.0f64..300.0,
            n in 1usize..40,
        ) {
            let corners = [[x, y, 0.0], [x + dx, y, 0.0], [x, y + dy, 0.0]];
            let a = tessellate_triangle(corners, Axis3::Z, 30.0, n).unwrap();
            let b = tessellate_triangle(corners, Axis3::Z, 30.0, n).unwrap();
            prop_assert_eq!(a.len(), n);
            for (s, t) in a.iter().zip(&b) {
                for k in 0..3 {
                    prop_assert_eq!(s.center[k].to_bits(), t.center[k].to_bits());
                    prop_assert_eq!(s.size[k].to_bits(), t.size[k].to_bits());
                }
            }
        }
    }
}
