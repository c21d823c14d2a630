//! Closed-form field of a uniformly polarized box.
//!
//! The field outside the box is that of the magnetic surface charge
//! `sigma = J . n` on its six faces. Each face is a rectangular sheet
//! whose field integrates analytically:
//!
//! ```text
//! B_p = s/(4pi) * sum_ij (-1)^(i+j) ln(v_j + R_ij)
//! B_q = s/(4pi) * sum_ij (-1)^(i+j) ln(u_i + R_ij)
//! B_n = s/(4pi) * sum_ij (-1)^(i+j) atan(u_i v_j / (w R_ij))
//! ```
//!
//! with `u`, `v` the in-plane offsets from the probe to the sheet edges,
//! `w` the probe height above the sheet and `R` the corner distance.
//! Inside the box the polarization `J` is added to obtain B.
//!
//! The field is singular on box edges.

use crate::record::Cuboid;
use std::f64::consts::PI;
use umag_core::vector::{self, Axis3};
use umag_core::Vec3;

/// A box of uniform polarization `J` (tesla), dimensions in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxMagnet {
    /// Geometry.
    pub shape: Cuboid,
    /// Polarization `J = mu0 M` in tesla.
    pub polarization: Vec3,
}

/// `ln(t + r)` where `r = sqrt(t^2 + rest)`, stable for negative `t`.
#[inline]
fn ln_t_plus_r(t: f64, r: f64, rest: f64) -> f64 {
    if t >= 0.0 {
        (t + r).ln()
    } else {
        rest.ln() - (r - t).ln()
    }
}

/// Field (per unit surface charge, times 4 pi) of the face of `lo..hi`
/// perpendicular to `normal` at height `level`, evaluated at `point`.
fn sheet_field(point: Vec3, normal: Axis3, level: f64, lo: Vec3, hi: Vec3) -> Vec3 {
    let [p, q] = normal.others();
    let (p, q, n) = (p.index(), q.index(), normal.index());
    let w = point[n] - level;
    let us = [lo[p] - point[p], hi[p] - point[p]];
    let vs = [lo[q] - point[q], hi[q] - point[q]];

    let mut out = [0.0; 3];
    for (i, &u) in us.iter().enumerate() {
        for (j, &v) in vs.iter().enumerate() {
            let sign = if i == j { 1.0 } else { -1.0 };
            let r = (u * u + v * v + w * w).sqrt();
            out[p] += sign * ln_t_plus_r(v, r, u * u + w * w);
            out[q] += sign * ln_t_plus_r(u, r, v * v + w * w);
            if w != 0.0 {
                out[n] += sign * (u * v / (w * r)).atan();
            }
        }
    }
    out
}

impl BoxMagnet {
    /// A magnet of the given geometry and polarization.
    pub fn new(shape: Cuboid, polarization: Vec3) -> Self {
        Self {
            shape,
            polarization,
        }
    }

    /// Magnetic flux density (tesla) at `point` (metres).
    pub fn field_at(&self, point: Vec3) -> Vec3 {
        let half = vector::scale(self.shape.size, 0.5);
        let lo = vector::sub(self.shape.center, half);
        let hi = vector::add(self.shape.center, half);

        let mut b = [0.0; 3];
        for axis in Axis3::ALL {
            let j = self.polarization[axis.index()];
            if j == 0.0 {
                continue;
            }
            let top = sheet_field(point, axis, hi[axis.index()], lo, hi);
            let bottom = sheet_field(point, axis, lo[axis.index()], lo, hi);
            b = vector::add(b, vector::scale(vector::sub(top, bottom), j / (4.0 * PI)));
        }
        if self.shape.contains(point) {
            b = vector::add(b, self.polarization);
        }
        b
    }

    /// Move the magnet by `displacement` (metres).
    pub fn translate(&mut self, displacement: Vec3) {
        self.shape = self.shape.translated(displacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(j: Vec3) -> BoxMagnet {
        BoxMagnet::new(Cuboid::new([0.0; 3], [2.0, 2.0, 2.0]), j)
    }

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1e-30)
    }

    #[test]
    fn cube_center_field_is_two_thirds_polarization() {
        for axis in Axis3::ALL {
            let j = vector::along(axis, 1.2);
            let b = cube(j).field_at([0.0; 3]);
            assert!(close(b[axis.index()], 0.8, 1e-12), "{axis}: {b:?}");
            for other in axis.others() {
                assert!(b[other.index()].abs() < 1e-12);
            }
        }
    }

    #[test]
    fn far_field_on_axis_matches_dipole() {
        let m = cube([0.0, 0.0, 1.0]);
        let d = 50.0;
        let b = m.field_at([0.0, 0.0, d]);
        // B = J V / (2 pi d^3) for a dipole on its axis.
        let expected = 8.0 / (2.0 * PI * d * d * d);
        assert!(close(b[2], expected, 1e-3), "{} vs {expected}", b[2]);
    }

    #[test]
    fn far_field_off_axis_matches_dipole() {
        let m = cube([1.0, 0.0, 0.0]);
        let d = 60.0;
        // Equatorial plane: B = -J V / (4 pi d^3).
        let b = m.field_at([0.0, d, 0.0]);
        let expected = -8.0 / (4.0 * PI * d * d * d);
        assert!(close(b[0], expected, 1e-3), "{} vs {expected}", b[0]);
        assert!(b[1].abs() < 1e-9);
    }

    #[test]
    fn field_is_stable_far_below_the_box() {
        let m = cube([0.0, 1.0, 0.0]);
        let b = m.field_at([0.0, -1e4, 0.0]);
        assert!(b.iter().all(|v| v.is_finite()));
        assert!(b[1] > 0.0);
    }

    #[test]
    fn translation_moves_the_field() {
        let mut m = cube([0.0, 0.0, 1.0]);
        let before = m.field_at([0.0, 0.0, 5.0]);
        m.translate([1.0, 0.0, 0.0]);
        let after = m.field_at([1.0, 0.0, 5.0]);
        for k in 0..3 {
            assert!((before[k] - after[k]).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_volume_slab_has_no_field() {
        let m = BoxMagnet::new(Cuboid::new([0.0; 3], [0.0, 1.0, 1.0]), [1.0, 1.0, 1.0]);
        let b = m.field_at([3.0, 2.0, 1.0]);
        assert!(b.iter().all(|v| v.abs() < 1e-12), "{b:?}");
    }
}
